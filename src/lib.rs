// DoseWatch - push-notification subscription lifecycle for a
// medication-reminder client.
//
// This facade re-exports the workspace crates and wires a coordinator
// from environment settings.

use std::sync::Arc;

// Re-export the core lifecycle manager
pub use dosewatch_push::*;

// Re-export member crates
pub use dosewatch_config;
pub use dosewatch_sync;

use dosewatch_config::Settings;
use dosewatch_sync::{BackendSyncClient, SyncClientConfig};

/// Build a coordinator for explicit settings and platform hosts.
pub fn coordinator_with_settings(
    settings: &Settings,
    hosts: HostSet,
) -> Result<SubscriptionCoordinator, BackendSyncError> {
    let client = BackendSyncClient::new(
        SyncClientConfig::builder()
            .base_url(&settings.backend_url)
            .build(),
    )?;
    Ok(SubscriptionCoordinator::new(
        hosts,
        Arc::new(client),
        settings.vapid_public_key.clone(),
    ))
}

/// Build a coordinator from the environment (`DOSEWATCH_BACKEND_URL`,
/// `DOSEWATCH_VAPID_PUBLIC_KEY`) and the given platform hosts.
///
/// A missing VAPID key is a valid state: the coordinator is still
/// built and the enable flow reports the missing key as an outcome.
pub fn coordinator_from_env(hosts: HostSet) -> Result<SubscriptionCoordinator, BackendSyncError> {
    coordinator_with_settings(&Settings::from_env(), hosts)
}

// Prelude for common imports
pub mod prelude {
    pub use crate::{coordinator_from_env, coordinator_with_settings};
    pub use dosewatch_config::Settings;
    pub use dosewatch_push::prelude::*;
    pub use dosewatch_sync::{BackendSyncClient, SyncClientConfig};
}
