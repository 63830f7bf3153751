//! Notification-permission negotiation.

use tracing::debug;

use crate::error::HostError;
use crate::host::PermissionHost;
use crate::subscription::PermissionState;

/// Ensure a permission decision exists, prompting at most once.
///
/// `Granted` and `Denied` return immediately without a prompt; the
/// platform disallows re-prompting once denied. Only the `Default`
/// state issues a prompt, and exactly one.
pub async fn ensure_permission(
    host: &dyn PermissionHost,
) -> Result<PermissionState, HostError> {
    match host.current() {
        PermissionState::Granted => Ok(PermissionState::Granted),
        PermissionState::Denied => {
            debug!("notification permission already denied; not prompting");
            Ok(PermissionState::Denied)
        }
        PermissionState::Default => {
            debug!("requesting notification permission");
            let state = host.request().await?;
            debug!(?state, "permission prompt settled");
            Ok(state)
        }
    }
}
