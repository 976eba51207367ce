//! Configuration loading and typed config structures for the HexTrail simulation.
//!
//! Configuration lives in `hextrail-config.yaml` in the working directory.
//! Every field is optional; missing fields take the defaults below. The
//! loaded value is validated once, before any simulation is built from it.

use std::path::Path;

use serde::Deserialize;

/// Environment variable that overrides `world.seed`.
pub const SEED_ENV_VAR: &str = "HEXTRAIL_SEED";

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is outside its permitted range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Lattice size and seed.
    #[serde(default)]
    pub world: WorldConfig,

    /// Population ceiling and strategy selection.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Trace lifetime, fading, and eviction.
    #[serde(default)]
    pub traces: TraceConfig,

    /// Tick and spawn pacing.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Values passed through to the renderer.
    #[serde(default)]
    pub render: RenderConfig,

    /// Run boundaries for the runner.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// `HEXTRAIL_SEED` overrides `world.seed` when set to a valid integer.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.world.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check every value against its permitted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.world;
        if w.columns == 0 || w.rows == 0 {
            return Err(invalid("world.columns", "columns and rows must be at least 1"));
        }
        if !w.hex_size.is_finite() || w.hex_size < hextrail_grid::lattice::MIN_HEX_SIZE {
            return Err(invalid(
                "world.hex_size",
                format!("must be finite and at least 2, got {}", w.hex_size),
            ));
        }
        let p = &self.population;
        if p.max_agents == 0 {
            return Err(invalid("population.max_agents", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&p.mutation_rate) {
            return Err(invalid(
                "population.mutation_rate",
                format!("must be within [0, 1], got {}", p.mutation_rate),
            ));
        }
        let t = &self.traces;
        non_negative("traces.trace_lifetime_secs", t.trace_lifetime_secs)?;
        non_negative("traces.fade_duration_secs", t.fade_duration_secs)?;
        if t.prune_interval_ticks == 0 {
            return Err(invalid("traces.prune_interval_ticks", "must be at least 1"));
        }
        if t.spawn_attempts == 0 {
            return Err(invalid("traces.spawn_attempts", "must be at least 1"));
        }
        if !self.render.line_width.is_finite() || self.render.line_width <= 0.0 {
            return Err(invalid(
                "render.line_width",
                format!("must be positive, got {}", self.render.line_width),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be a non-negative number, got {value}")))
    }
}

/// Lattice size and seed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable run name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Seed for the single simulation RNG.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Lattice points per row.
    #[serde(default = "default_columns")]
    pub columns: u32,

    /// Number of rows.
    #[serde(default = "default_rows")]
    pub rows: u32,

    /// Lattice edge length in length units.
    #[serde(default = "default_hex_size")]
    pub hex_size: f64,
}

impl WorldConfig {
    /// Apply `HEXTRAIL_SEED` if it is set and parses as `u64`.
    pub fn apply_env_overrides(&mut self) {
        if let Some(seed) = std::env::var(SEED_ENV_VAR)
            .ok()
            .and_then(|v| v.trim().parse().ok())
        {
            self.seed = seed;
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            columns: default_columns(),
            rows: default_rows(),
            hex_size: default_hex_size(),
        }
    }
}

/// Population configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PopulationConfig {
    /// Live agent ceiling.
    #[serde(default = "default_max_agents")]
    pub max_agents: u32,

    /// Agents spawned when the simulation is built.
    #[serde(default = "default_initial_agents")]
    pub initial_agents: u32,

    /// Probability that a spawn ignores fitness and draws uniformly.
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            max_agents: default_max_agents(),
            initial_agents: default_initial_agents(),
            mutation_rate: default_mutation_rate(),
        }
    }
}

/// Trace lifecycle configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TraceConfig {
    /// Seconds a dead trace stays at full brightness.
    #[serde(default = "default_trace_lifetime_secs")]
    pub trace_lifetime_secs: f64,

    /// Seconds a dead trace takes to fade after the lifetime.
    #[serde(default = "default_fade_duration_secs")]
    pub fade_duration_secs: f64,

    /// Keep dead traces until space is needed instead of fading them.
    #[serde(default)]
    pub infinite_lifetime: bool,

    /// Ticks between prune passes in fading mode.
    #[serde(default = "default_prune_interval_ticks")]
    pub prune_interval_ticks: u64,

    /// Recent segments checked for path crossings.
    #[serde(default = "default_crossing_window")]
    pub crossing_window: usize,

    /// Random probes for a free cell before the exhaustive scan.
    #[serde(default = "default_spawn_attempts")]
    pub spawn_attempts: u32,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            trace_lifetime_secs: default_trace_lifetime_secs(),
            fade_duration_secs: default_fade_duration_secs(),
            infinite_lifetime: false,
            prune_interval_ticks: default_prune_interval_ticks(),
            crossing_window: default_crossing_window(),
            spawn_attempts: default_spawn_attempts(),
        }
    }
}

/// Tick and spawn pacing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimingConfig {
    /// Minimum milliseconds between ticks.
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,

    /// Minimum milliseconds between spawn attempts.
    #[serde(default = "default_spawn_delay_ms")]
    pub spawn_delay_ms: u64,
}

impl TimingConfig {
    /// Step delay in seconds.
    pub const fn step_delay_secs(&self) -> f64 {
        millis_to_secs(self.step_delay_ms)
    }

    /// Spawn delay in seconds.
    pub const fn spawn_delay_secs(&self) -> f64 {
        millis_to_secs(self.spawn_delay_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: default_step_delay_ms(),
            spawn_delay_ms: default_spawn_delay_ms(),
        }
    }
}

/// Renderer pass-through values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RenderConfig {
    /// Stroke width. Not used by the simulation itself.
    #[serde(default = "default_line_width")]
    pub line_width: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            line_width: default_line_width(),
        }
    }
}

/// Run boundaries enforced by the runner. Zero means unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Stop after this many ticks.
    #[serde(default)]
    pub max_ticks: u64,

    /// Stop after this many wall-clock seconds.
    #[serde(default)]
    pub max_real_time_seconds: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
const fn millis_to_secs(ms: u64) -> f64 {
    ms as f64 / 1_000.0
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "hextrail".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_columns() -> u32 {
    40
}

const fn default_rows() -> u32 {
    30
}

const fn default_hex_size() -> f64 {
    20.0
}

const fn default_max_agents() -> u32 {
    50
}

const fn default_initial_agents() -> u32 {
    1
}

const fn default_mutation_rate() -> f64 {
    0.1
}

const fn default_trace_lifetime_secs() -> f64 {
    10.0
}

const fn default_fade_duration_secs() -> f64 {
    5.0
}

const fn default_prune_interval_ticks() -> u64 {
    10
}

const fn default_crossing_window() -> usize {
    100
}

const fn default_spawn_attempts() -> u32 {
    hextrail_agents::population::DEFAULT_SPAWN_ATTEMPTS
}

const fn default_step_delay_ms() -> u64 {
    50
}

const fn default_spawn_delay_ms() -> u64 {
    500
}

const fn default_line_width() -> f64 {
    2.0
}

fn default_log_level() -> String {
    "info".to_owned()
}
