//! # DoseWatch Push
//!
//! Push-subscription lifecycle management for the DoseWatch
//! medication-reminder client.
//!
//! ## Features
//!
//! - **Capability probing**: notification, background-script, and push
//!   support detection with browser-family fingerprinting
//! - **Bounded-time subscribe**: the platform subscribe call races a
//!   per-family timeout budget; quirky families get a longer budget and
//!   an upfront risk warning
//! - **Backend sync**: active subscriptions are mirrored to a registry,
//!   and a registry failure never blocks local delivery
//! - **Injectable hosts**: every platform surface is a trait, so the
//!   whole state machine runs deterministically against fakes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dosewatch_push::{HostSet, SubscriptionCoordinator};
//!
//! # async fn run(hosts: HostSet, registry: std::sync::Arc<dyn dosewatch_push::SubscriptionRegistry>) {
//! let coordinator = SubscriptionCoordinator::new(
//!     hosts,
//!     registry,
//!     Some("BNcRdreALRFXTkOOUHK1EtK2wtaz5Ry4YfYCA_0QTpQtUbVlUls0VJXg7A8u-Ts1XbjhazAkj7I99e8QcYP7DkM".into()),
//! );
//!
//! let outcome = coordinator.enable_notifications().await;
//! if let Some(record) = outcome.record() {
//!     println!("subscribed at {}", record.endpoint);
//! }
//! # }
//! ```

mod capability;
mod coordinator;
mod error;
mod host;
mod key;
mod notification;
mod permission;
mod registrar;
mod script;
mod subscription;

pub use capability::{
    BrowserFamily, BrowserProfile, Capability, DEFAULT_TIMEOUT_BUDGET_MS, QUIRKY_TIMEOUT_BUDGET_MS,
    QuirkFlags, classify, probe,
};
pub use coordinator::{HostSet, Phase, SubscriptionCoordinator};
pub use error::{BackendSyncError, HostError, KeyError, TeardownError};
pub use host::{
    CacheHost, ClientsHost, NotificationHost, PermissionHost, PushHost, RegistrationHandle,
    RegistrationHost, RuntimeHost, SubscriptionRegistry, UserPrompt,
};
pub use key::decode_vapid_key;
pub use notification::{
    ACTION_CLOSE, ACTION_OPEN, BADGE_PATH, DEFAULT_BODY, DEFAULT_TAG, DEFAULT_TITLE, ICON_PATH,
    NotificationAction, NotificationPayload,
};
pub use permission::ensure_permission;
pub use registrar::{SCRIPT_URL, register_and_wait_ready};
pub use script::{BackgroundScript, CACHE_NAME, SHELL_ASSETS, ScriptEvent};
pub use subscription::{
    PermissionState, PlatformErrorKind, SetupStatus, SubscriptionKeys, SubscriptionOutcome,
    SubscriptionRecord, SyncStatus,
};

/// Prelude for common imports.
///
/// ```
/// use dosewatch_push::prelude::*;
/// ```
pub mod prelude {
    pub use crate::coordinator::{HostSet, Phase, SubscriptionCoordinator};
    pub use crate::error::{BackendSyncError, HostError, KeyError, TeardownError};
    pub use crate::host::{
        CacheHost, ClientsHost, NotificationHost, PermissionHost, PushHost, RegistrationHandle,
        RegistrationHost, RuntimeHost, SubscriptionRegistry, UserPrompt,
    };
    pub use crate::notification::{NotificationAction, NotificationPayload};
    pub use crate::script::{BackgroundScript, ScriptEvent};
    pub use crate::subscription::{
        PermissionState, PlatformErrorKind, SetupStatus, SubscriptionKeys, SubscriptionOutcome,
        SubscriptionRecord, SyncStatus,
    };
}
