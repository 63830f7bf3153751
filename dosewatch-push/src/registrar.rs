//! Background-script registration.

use tracing::{info, warn};

use crate::error::HostError;
use crate::host::{RegistrationHandle, RegistrationHost, RuntimeHost};

/// Location of the background script served with the application shell.
pub const SCRIPT_URL: &str = "/sw.js";

/// Install the background script and suspend until it is ready.
///
/// Returns `None` (with a log line) when the platform lacks
/// background-script support; installation itself is idempotent.
pub async fn register_and_wait_ready(
    runtime: &dyn RuntimeHost,
    host: &dyn RegistrationHost,
) -> Result<Option<RegistrationHandle>, HostError> {
    if !runtime.supports_background_scripts() {
        warn!("background scripts are not supported; skipping registration");
        return Ok(None);
    }

    host.register(SCRIPT_URL).await?;
    let handle = host.ready().await?;
    info!(scope = %handle.scope, "background script registered and ready");
    Ok(Some(handle))
}
