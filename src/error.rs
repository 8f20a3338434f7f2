//! Unified error types for the health monitor
//!
//! Every error here is fatal for the invocation and maps to the
//! configuration-error exit status. An unhealthy component is not an error:
//! it is a normal outcome of a check (see `sickbay::HealthStatus`).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit status reported for fatal configuration or resolution errors
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Main error type for health monitor operations
#[derive(Error, Debug)]
pub enum Error {
    // Settings errors
    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation failed: {0}")]
    ConfigValidation(String),

    // Resolution errors
    #[error("Health monitoring for component {0} is not supported!")]
    UnsupportedComponent(String),

    #[error("The {0} file does not exist! Terminate health monitoring")]
    KubeEnvMissing(PathBuf),

    #[error("Failed to read node config '{path}': {source}")]
    KubeEnvRead { path: PathBuf, source: io::Error },
}

impl Error {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        EXIT_CONFIG_ERROR
    }
}

/// Result type alias for health monitor operations
pub type Result<T> = std::result::Result<T, Error>;
