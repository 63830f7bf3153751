//! Application settings.

use tracing::debug;

use crate::EnvLoader;

/// Prefix for every DoseWatch environment variable.
pub const ENV_PREFIX: &str = "DOSEWATCH";

/// Backend base URL used when none is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Environment-driven application settings.
///
/// An absent or blank VAPID public key is a valid configuration state:
/// the enable flow reports it as an actionable outcome instead of the
/// process failing to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Backend base URL (`DOSEWATCH_BACKEND_URL`).
    pub backend_url: String,
    /// Server push public key (`DOSEWATCH_VAPID_PUBLIC_KEY`), if set.
    pub vapid_public_key: Option<String>,
}

impl Settings {
    /// Load settings from the environment, reading a `.env` file first
    /// when one exists.
    pub fn from_env() -> Self {
        // A missing .env file is the normal production case.
        let _ = dotenvy::dotenv();

        let loader = EnvLoader::new(Some(ENV_PREFIX.to_string()));
        let backend_url = loader.load_var_or("BACKEND_URL", DEFAULT_BACKEND_URL);
        let vapid_public_key = loader.load_optional("VAPID_PUBLIC_KEY");

        debug!(
            %backend_url,
            vapid_key_configured = vapid_public_key.is_some(),
            "loaded settings"
        );

        Self {
            backend_url,
            vapid_public_key,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            vapid_public_key: None,
        }
    }
}
