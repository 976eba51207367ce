//! Segment crossing tests used by move legality.
//!
//! Two segments cross only when both interpolation parameters fall strictly
//! inside `(CROSSING_MARGIN, 1 - CROSSING_MARGIN)`. Touching at or near an
//! endpoint is not a crossing, and neither are collinear or zero-length
//! segments.

use hextrail_types::{Point, TraceSegment};

/// Parameter margin at each end of a segment inside which touches are ignored.
pub const CROSSING_MARGIN: f64 = 0.05;

/// Denominators below this magnitude are treated as parallel.
const PARALLEL_EPSILON: f64 = 1e-9;

fn cross(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ax.mul_add(by, -(ay * bx))
}

/// Whether segment `a0 -> a1` properly crosses segment `b0 -> b1`.
pub fn segments_cross(a0: Point, a1: Point, b0: Point, b1: Point) -> bool {
    let (rx, ry) = (a1.x - a0.x, a1.y - a0.y);
    let (sx, sy) = (b1.x - b0.x, b1.y - b0.y);
    let denom = cross(rx, ry, sx, sy);
    if denom.abs() < PARALLEL_EPSILON {
        return false;
    }
    let (qx, qy) = (b0.x - a0.x, b0.y - a0.y);
    let t = cross(qx, qy, sx, sy) / denom;
    let u = cross(qx, qy, rx, ry) / denom;
    let inside = |v: f64| v > CROSSING_MARGIN && v < 1.0 - CROSSING_MARGIN;
    inside(t) && inside(u)
}

/// Whether any endpoint of `from -> to` lies within `tolerance` of an
/// endpoint of `segment`.
pub fn shares_endpoint(from: Point, to: Point, segment: &TraceSegment, tolerance: f64) -> bool {
    [from, to].iter().any(|p| {
        p.distance(segment.from) <= tolerance || p.distance(segment.to) <= tolerance
    })
}

/// Whether `from -> to` crosses any of `segments`, ignoring segments that
/// share an endpoint with it.
pub fn crosses_any(from: Point, to: Point, segments: &[TraceSegment], tolerance: f64) -> bool {
    segments.iter().any(|seg| {
        !shares_endpoint(from, to, seg, tolerance) && segments_cross(from, to, seg.from, seg.to)
    })
}

#[cfg(test)]
mod tests {
    use hextrail_types::AgentId;

    use super::*;

    fn seg(from: Point, to: Point) -> TraceSegment {
        TraceSegment {
            from,
            to,
            owner: AgentId::new(0),
            hue_seed: 0.0,
            birth_time: 0.0,
            created_at: 0.0,
            sequence_index: 0,
        }
    }

    #[test]
    fn perpendicular_segments_cross() {
        assert!(segments_cross(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 0.0),
        ));
    }

    #[test]
    fn touching_at_endpoint_is_not_a_crossing() {
        assert!(!segments_cross(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ));
        // T-junction right at the margin of the second segment.
        assert!(!segments_cross(
            Point::new(0.0, 5.0),
            Point::new(10.0, 5.0),
            Point::new(5.0, 5.2),
            Point::new(5.0, 15.0),
        ));
    }

    #[test]
    fn parallel_and_dot_segments_never_cross() {
        assert!(!segments_cross(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(10.0, 1.0),
        ));
        let dot = Point::new(5.0, 0.0);
        assert!(!segments_cross(Point::new(0.0, -5.0), Point::new(10.0, 5.0), dot, dot));
    }

    #[test]
    fn shared_endpoints_are_skipped() {
        let trace = [seg(Point::new(0.0, 10.0), Point::new(10.0, 0.0))];
        // Crosses in the middle: reported.
        assert!(crosses_any(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            &trace,
            1.0
        ));
        // Starts where the trace ends: skipped.
        assert!(!crosses_any(
            Point::new(10.0, 0.0),
            Point::new(0.0, 0.0),
            &trace,
            1.0
        ));
    }
}
