//! Type-safe identifier wrappers.
//!
//! Agent identifiers are issued sequentially by the population manager so
//! that two runs with the same seed produce the same ids, and so that id
//! order matches spawn order.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around a `u64` sequence number with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub u64);

        impl $name {
            /// Create an identifier from a raw sequence number.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Return the inner sequence number.
            pub const fn into_inner(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an agent in the simulation.
    AgentId
}

/// Monotonic issuer of [`AgentId`] values.
///
/// Ids are never reused within a run, even after the owning agent's trace
/// has been pruned.
#[derive(Debug, Clone, Default)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    /// Create a sequence that starts at id 0.
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Issue the next agent id.
    pub const fn next_agent(&mut self) -> AgentId {
        let id = AgentId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}
