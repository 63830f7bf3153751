//! Host capability traits.
//!
//! The lifecycle manager never touches ambient platform globals
//! directly. Every platform surface it needs (permission API, push
//! manager, background-script registry, caches, notification display,
//! user dialogs) is an injected trait object, so the state machine
//! runs unchanged against the real platform or against fakes.

use async_trait::async_trait;

use crate::error::{BackendSyncError, HostError};
use crate::notification::NotificationPayload;
use crate::subscription::{PermissionState, SubscriptionRecord};

// ============================================================================
// Page-side hosts
// ============================================================================

/// Static runtime capabilities and identity signals, read once per session.
pub trait RuntimeHost: Send + Sync {
    /// The runtime can display system notifications.
    fn supports_notifications(&self) -> bool;

    /// The runtime can install background scripts.
    fn supports_background_scripts(&self) -> bool;

    /// The runtime can receive push delivery.
    fn supports_push(&self) -> bool;

    /// The runtime's user-agent string.
    fn user_agent(&self) -> String;

    /// Vendor-level flag some Chromium derivatives expose. Authoritative
    /// over user-agent token sniffing when set.
    fn vendor_reports_brave(&self) -> bool {
        false
    }
}

/// Notification-permission surface.
#[async_trait]
pub trait PermissionHost: Send + Sync {
    /// Current permission state, without prompting.
    fn current(&self) -> PermissionState;

    /// Issue the platform permission prompt and suspend until the user
    /// answers. At most one prompt per call.
    async fn request(&self) -> Result<PermissionState, HostError>;
}

/// Background-script installation surface.
#[async_trait]
pub trait RegistrationHost: Send + Sync {
    /// Install the background script. Installing an already-installed
    /// script is a no-op.
    async fn register(&self, script_url: &str) -> Result<(), HostError>;

    /// Suspend until the installation reaches its ready state.
    async fn ready(&self) -> Result<RegistrationHandle, HostError>;
}

/// Handle to an active background-script registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationHandle {
    /// Scope the registration controls.
    pub scope: String,
}

/// Platform push-subscription store.
///
/// The store enforces the at-most-one-subscription invariant; the
/// manager only queries and mutates it through this surface.
#[async_trait]
pub trait PushHost: Send + Sync {
    /// The subscription currently held by the store, if any.
    async fn existing_subscription(&self) -> Result<Option<SubscriptionRecord>, HostError>;

    /// Create a subscription keyed to the given application server key.
    ///
    /// May hang indefinitely on quirky platforms; callers bound it with
    /// a timeout and there is no cancellation primitive for the call
    /// itself.
    async fn subscribe(
        &self,
        application_server_key: Vec<u8>,
    ) -> Result<SubscriptionRecord, HostError>;

    /// Remove the active subscription. `Ok(false)` when none existed.
    async fn unsubscribe(&self) -> Result<bool, HostError>;
}

/// Blocking user confirmation dialog.
#[async_trait]
pub trait UserPrompt: Send + Sync {
    /// Present a yes/no confirmation and suspend until the user answers.
    async fn confirm(&self, message: &str) -> bool;
}

/// System notification display surface.
///
/// Used by the background script for push-driven reminders and by the
/// page for local test notifications.
#[async_trait]
pub trait NotificationHost: Send + Sync {
    /// Display a notification. The returned future settles only once
    /// the display operation completes.
    async fn show(&self, payload: &NotificationPayload) -> Result<(), HostError>;

    /// Dismiss the notification displayed under the given tag.
    async fn dismiss(&self, tag: &str) -> Result<(), HostError>;
}

// ============================================================================
// Background-script-side hosts
// ============================================================================

/// Named resource-cache store available to the background script.
#[async_trait]
pub trait CacheHost: Send + Sync {
    /// Open (or create) the named cache and fill it with the given assets.
    async fn open_and_fill(&self, cache_name: &str, assets: &[&str]) -> Result<(), HostError>;

    /// Names of every cache currently held by the store.
    async fn cache_names(&self) -> Result<Vec<String>, HostError>;

    /// Delete the named cache. `Ok(false)` when it did not exist.
    async fn delete_cache(&self, cache_name: &str) -> Result<bool, HostError>;
}

/// Control over the pages this background script serves.
#[async_trait]
pub trait ClientsHost: Send + Sync {
    /// Activate the newly installed script without waiting for old
    /// instances to drain.
    async fn skip_waiting(&self) -> Result<(), HostError>;

    /// Take control of currently open pages.
    async fn claim(&self) -> Result<(), HostError>;

    /// Open the application's root view, or focus it if already open.
    async fn open_root(&self) -> Result<(), HostError>;
}

// ============================================================================
// Backend registry
// ============================================================================

/// Backend mirror of platform subscriptions.
///
/// Each call is a single round trip with no retry.
#[async_trait]
pub trait SubscriptionRegistry: Send + Sync {
    /// Persist a subscription record.
    async fn save(&self, record: &SubscriptionRecord) -> Result<(), BackendSyncError>;

    /// Remove every subscription record for the caller's identity.
    async fn purge_all(&self) -> Result<(), BackendSyncError>;

    /// Ask the backend to deliver a test push.
    async fn trigger_test(&self) -> Result<(), BackendSyncError>;
}
