//! Subscription data model.

use serde::{Deserialize, Serialize};

/// Platform notification-permission state.
///
/// Set only by the platform; the manager reads it and never writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// No decision has been made yet; a prompt is allowed.
    Default,
    /// The user granted notification permission.
    Granted,
    /// The user denied notification permission. The platform disallows
    /// re-prompting from this state.
    Denied,
}

impl PermissionState {
    /// Whether notifications may be shown.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Encryption keys attached to a platform subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    /// p256dh key.
    pub p256dh: String,
    /// Auth secret.
    pub auth: String,
}

/// A platform-issued push subscription.
///
/// Created by the platform on a successful subscribe and owned by its
/// subscription store; the backend registry only mirrors it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    /// Delivery endpoint URL.
    pub endpoint: String,
    /// Encryption keys.
    pub keys: SubscriptionKeys,
}

impl SubscriptionRecord {
    /// Create a new subscription record.
    pub fn new(
        endpoint: impl Into<String>,
        p256dh: impl Into<String>,
        auth: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            keys: SubscriptionKeys {
                p256dh: p256dh.into(),
                auth: auth.into(),
            },
        }
    }
}

/// Result of the backend registry write after a subscription became active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// The registry accepted the record.
    Synced,
    /// No write was attempted; the platform already held the record and
    /// the registry mirror is assumed current.
    Skipped,
    /// The registry write failed. The subscription stays active on the
    /// platform; local delivery is not blocked by this.
    Failed(String),
}

/// Classified failure kind for a platform-level subscribe fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformErrorKind {
    /// No server public key was configured.
    MissingVapidKey,
    /// The configured server public key is not valid base64url, or the
    /// platform rejected it as an application server key.
    InvalidKey,
    /// Any other native platform error, carrying its native name.
    Native(String),
}

/// Terminal outcome of the enable flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionOutcome {
    /// A subscription is active on the platform.
    Active {
        /// The active subscription.
        record: SubscriptionRecord,
        /// Whether the backend registry mirrors it.
        sync: SyncStatus,
    },
    /// The platform lacks a required capability.
    Unsupported {
        /// Which capabilities were missing.
        reason: String,
    },
    /// The user declined the quirky-browser risk warning.
    UserDeclined,
    /// Notification permission is not granted.
    PermissionDenied,
    /// The platform subscribe call did not settle within the budget.
    TimedOut {
        /// Elapsed budget in milliseconds.
        after_ms: u64,
        /// Browser-specific recovery advice.
        guidance: String,
    },
    /// A configuration or platform fault.
    PlatformError {
        /// Classified fault kind.
        kind: PlatformErrorKind,
        /// Actionable message.
        message: String,
    },
}

impl SubscriptionOutcome {
    /// Whether a subscription is active on the platform.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    /// The active subscription record, if any.
    pub fn record(&self) -> Option<&SubscriptionRecord> {
        match self {
            Self::Active { record, .. } => Some(record),
            _ => None,
        }
    }

    /// Whether retrying the enable flow could succeed without the user
    /// first changing platform settings.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::TimedOut { .. } | Self::PlatformError { .. } => true,
            Self::Active { .. }
            | Self::Unsupported { .. }
            | Self::UserDeclined
            | Self::PermissionDenied => false,
        }
    }
}

/// Read-only setup status for the UI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupStatus {
    /// The platform has every required capability.
    pub supported: bool,
    /// Current permission state.
    pub permission: PermissionState,
    /// A subscription exists in the platform store.
    pub subscribed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_wire_shape() {
        let record = SubscriptionRecord::new("https://push.example/abc", "p-key", "a-key");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["endpoint"], "https://push.example/abc");
        assert_eq!(json["keys"]["p256dh"], "p-key");
        assert_eq!(json["keys"]["auth"], "a-key");
    }

    #[test]
    fn test_permission_state_serde() {
        assert_eq!(
            serde_json::to_string(&PermissionState::Granted).unwrap(),
            "\"granted\""
        );
        let state: PermissionState = serde_json::from_str("\"denied\"").unwrap();
        assert_eq!(state, PermissionState::Denied);
    }

    #[test]
    fn test_outcome_retryability() {
        assert!(
            SubscriptionOutcome::TimedOut {
                after_ms: 10_000,
                guidance: String::new(),
            }
            .is_retryable()
        );
        assert!(
            SubscriptionOutcome::PlatformError {
                kind: PlatformErrorKind::MissingVapidKey,
                message: String::new(),
            }
            .is_retryable()
        );
        assert!(!SubscriptionOutcome::PermissionDenied.is_retryable());
        assert!(!SubscriptionOutcome::UserDeclined.is_retryable());
    }

    #[test]
    fn test_outcome_record_accessor() {
        let record = SubscriptionRecord::new("https://push.example/abc", "p", "a");
        let outcome = SubscriptionOutcome::Active {
            record: record.clone(),
            sync: SyncStatus::Synced,
        };
        assert!(outcome.is_active());
        assert_eq!(outcome.record(), Some(&record));
        assert_eq!(SubscriptionOutcome::PermissionDenied.record(), None);
    }
}
