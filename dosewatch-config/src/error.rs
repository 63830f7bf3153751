//! Configuration error types.

use thiserror::Error;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The environment variable is absent or not unicode.
    #[error("Environment variable error: {0}")]
    EnvError(#[from] std::env::VarError),
}
