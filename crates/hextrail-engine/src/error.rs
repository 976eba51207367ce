//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and simulation execution.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: hextrail_core::ConfigError,
    },

    /// The simulation could not be built from the configuration.
    #[error("build error: {source}")]
    Build {
        /// The underlying build error.
        #[from]
        source: hextrail_core::BuildError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: hextrail_core::RunnerError,
    },

    /// Writing the render snapshot failed.
    #[error("snapshot error: {message}")]
    Snapshot {
        /// Description of the snapshot failure.
        message: String,
    },
}
