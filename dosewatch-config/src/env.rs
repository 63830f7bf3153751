// Environment variable loading

use std::env;

use crate::{ConfigError, Result};

/// Environment variable loader with an optional prefix.
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    /// Create a new environment loader.
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Load a specific environment variable.
    pub fn load_var(&self, key: &str) -> Result<String> {
        let full_key = if let Some(ref prefix) = self.prefix {
            format!("{}_{}", prefix, key.to_uppercase())
        } else {
            key.to_uppercase()
        };

        env::var(&full_key).map_err(ConfigError::EnvError)
    }

    /// Load with a default value.
    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.load_var(key).unwrap_or_else(|_| default.to_string())
    }

    /// Load a variable that may legitimately be absent or blank.
    /// Blank-after-trim values count as absent.
    pub fn load_optional(&self, key: &str) -> Option<String> {
        self.load_var(key)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(None)
    }
}
