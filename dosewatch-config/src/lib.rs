//! # DoseWatch Config
//!
//! Environment configuration for DoseWatch: the backend base URL and
//! the server push public key, with `.env` support for development.

mod env;
mod error;
mod settings;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use settings::{DEFAULT_BACKEND_URL, ENV_PREFIX, Settings};
