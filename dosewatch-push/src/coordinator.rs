//! The subscription coordinator: probe, confirm, register, negotiate
//! permission, subscribe under a bounded time budget, and mirror the
//! result to the backend registry.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, error, info, warn};

use crate::capability::{self, BrowserProfile};
use crate::error::{HostError, TeardownError};
use crate::host::{
    NotificationHost, PermissionHost, PushHost, RegistrationHost, RuntimeHost,
    SubscriptionRegistry, UserPrompt,
};
use crate::notification::NotificationPayload;
use crate::subscription::{
    PermissionState, PlatformErrorKind, SetupStatus, SubscriptionOutcome, SyncStatus,
};
use crate::{key, permission, registrar};

/// Page-side host surfaces the coordinator drives.
#[derive(Clone)]
pub struct HostSet {
    /// Capability and identity probe surface.
    pub runtime: Arc<dyn RuntimeHost>,
    /// Permission API surface.
    pub permission: Arc<dyn PermissionHost>,
    /// Background-script registry surface.
    pub registration: Arc<dyn RegistrationHost>,
    /// Push subscription store surface.
    pub push: Arc<dyn PushHost>,
    /// Blocking confirmation dialog surface.
    pub prompt: Arc<dyn UserPrompt>,
    /// Local notification display surface.
    pub notifications: Arc<dyn NotificationHost>,
}

/// Lifecycle phase of the most recent enable flow.
///
/// The flow itself is linear; the phase exists for observability and
/// is logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No registration has been attempted.
    Unregistered,
    /// The background script is installed and ready.
    Registered,
    /// The permission prompt may be showing.
    PermissionPending,
    /// Permission is granted.
    PermissionGranted,
    /// Permission is denied; terminal.
    PermissionDenied,
    /// The platform subscribe call is in flight.
    SubscribePending,
    /// A subscription is active on the platform.
    SubscriptionActive,
    /// The subscribe call failed or timed out; terminal.
    SubscriptionFailed,
    /// The registry mirrors the active subscription; terminal success.
    BackendSynced,
    /// The registry write failed; the subscription stays active.
    BackendSyncFailed,
}

/// Orchestrates the push-subscription lifecycle against injected hosts.
pub struct SubscriptionCoordinator {
    hosts: HostSet,
    registry: Arc<dyn SubscriptionRegistry>,
    vapid_public_key: Option<String>,
    phase: Mutex<Phase>,
}

impl SubscriptionCoordinator {
    /// Create a coordinator. A missing VAPID key is a valid
    /// configuration state, reported by the enable flow rather than
    /// here.
    pub fn new(
        hosts: HostSet,
        registry: Arc<dyn SubscriptionRegistry>,
        vapid_public_key: Option<String>,
    ) -> Self {
        Self {
            hosts,
            registry,
            vapid_public_key,
            phase: Mutex::new(Phase::Unregistered),
        }
    }

    /// Phase reached by the most recent enable flow.
    pub fn phase(&self) -> Phase {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_phase(&self, next: Phase) {
        debug!(phase = ?next, "lifecycle transition");
        *self.phase.lock().unwrap_or_else(|e| e.into_inner()) = next;
    }

    /// Drive the full enable flow and return its terminal outcome.
    ///
    /// Calling this with an already-active subscription returns the
    /// existing record without a new subscribe call or a permission
    /// prompt.
    pub async fn enable_notifications(&self) -> SubscriptionOutcome {
        self.set_phase(Phase::Unregistered);

        let cap = capability::probe(self.hosts.runtime.as_ref());
        if !cap.supported {
            let reason = cap.missing.join(", ");
            warn!(%reason, "push notifications unsupported on this platform");
            return SubscriptionOutcome::Unsupported { reason };
        }
        let profile = cap.profile;

        if profile.quirks.requires_confirmation && !self.confirm_quirky_family(&profile).await {
            info!(
                family = profile.family.name(),
                "user declined quirky-browser confirmation"
            );
            return SubscriptionOutcome::UserDeclined;
        }

        // A platform-level denial is terminal until the user changes
        // settings; nothing is installed for it.
        if self.hosts.permission.current() == PermissionState::Denied {
            self.set_phase(Phase::PermissionDenied);
            return SubscriptionOutcome::PermissionDenied;
        }

        match registrar::register_and_wait_ready(
            self.hosts.runtime.as_ref(),
            self.hosts.registration.as_ref(),
        )
        .await
        {
            Ok(Some(_)) => self.set_phase(Phase::Registered),
            Ok(None) => {
                return SubscriptionOutcome::Unsupported {
                    reason: "background-script unavailable".to_string(),
                };
            }
            Err(err) => {
                error!(%err, "background script registration failed");
                return SubscriptionOutcome::Unsupported {
                    reason: "background-script unavailable".to_string(),
                };
            }
        }

        self.set_phase(Phase::PermissionPending);
        let state = match permission::ensure_permission(self.hosts.permission.as_ref()).await {
            Ok(state) => state,
            Err(err) => {
                error!(%err, "permission negotiation failed");
                self.set_phase(Phase::PermissionDenied);
                return SubscriptionOutcome::PlatformError {
                    kind: PlatformErrorKind::Native(err.name),
                    message: err.message,
                };
            }
        };
        if !state.is_granted() {
            self.set_phase(Phase::PermissionDenied);
            return SubscriptionOutcome::PermissionDenied;
        }
        self.set_phase(Phase::PermissionGranted);

        // At most one subscription per device: reuse before subscribing.
        match self.hosts.push.existing_subscription().await {
            Ok(Some(record)) => {
                info!(endpoint = %record.endpoint, "reusing existing subscription");
                self.set_phase(Phase::SubscriptionActive);
                return SubscriptionOutcome::Active {
                    record,
                    sync: SyncStatus::Skipped,
                };
            }
            Ok(None) => {}
            Err(err) => {
                // Treated as no subscription; a duplicate subscribe is
                // rejected by the platform store, not by us.
                warn!(%err, "could not query existing subscription");
            }
        }

        let raw_key = self.vapid_public_key.as_deref().unwrap_or("").trim();
        if raw_key.is_empty() {
            warn!("VAPID public key not configured");
            self.set_phase(Phase::SubscriptionFailed);
            return SubscriptionOutcome::PlatformError {
                kind: PlatformErrorKind::MissingVapidKey,
                message: "VAPID public key not configured. Push subscriptions require \
                          VAPID keys."
                    .to_string(),
            };
        }

        let server_key = match key::decode_vapid_key(raw_key) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(%err, "VAPID key rejected before any platform call");
                self.set_phase(Phase::SubscriptionFailed);
                return SubscriptionOutcome::PlatformError {
                    kind: PlatformErrorKind::InvalidKey,
                    message: "VAPID key is invalid or incorrectly formatted. Check the \
                              configured public key."
                        .to_string(),
                };
            }
        };

        let record = match self.subscribe_within_budget(server_key, &profile).await {
            Ok(record) => record,
            Err(outcome) => return outcome,
        };
        self.set_phase(Phase::SubscriptionActive);

        // A registry write failure must not block local delivery: the
        // subscription stays active and is still returned.
        match self.registry.save(&record).await {
            Ok(()) => {
                info!(endpoint = %record.endpoint, "subscription mirrored to registry");
                self.set_phase(Phase::BackendSynced);
                SubscriptionOutcome::Active {
                    record,
                    sync: SyncStatus::Synced,
                }
            }
            Err(err) => {
                error!(%err, "failed to mirror subscription to registry");
                self.set_phase(Phase::BackendSyncFailed);
                SubscriptionOutcome::Active {
                    record,
                    sync: SyncStatus::Failed(err.to_string()),
                }
            }
        }
    }

    async fn confirm_quirky_family(&self, profile: &BrowserProfile) -> bool {
        let message = format!(
            "{} may have problems with the Push API and the subscription can \
             hang. Chrome or Firefox are recommended for full compatibility. \
             Continue anyway?",
            profile.family.name()
        );
        self.hosts.prompt.confirm(&message).await
    }

    /// Race the platform subscribe call against the profile's timeout
    /// budget. First to settle wins; on timeout the attempt is left
    /// running detached, since the platform call has no cancellation
    /// primitive, and a late success lands in the platform store.
    async fn subscribe_within_budget(
        &self,
        server_key: Vec<u8>,
        profile: &BrowserProfile,
    ) -> Result<crate::subscription::SubscriptionRecord, SubscriptionOutcome> {
        self.set_phase(Phase::SubscribePending);
        let budget_ms = profile.quirks.timeout_budget_ms;
        debug!(
            budget_ms,
            family = profile.family.name(),
            "subscribing with timeout budget"
        );

        let push = Arc::clone(&self.hosts.push);
        let mut attempt = tokio::spawn(async move { push.subscribe(server_key).await });
        let started = Instant::now();

        tokio::select! {
            joined = &mut attempt => {
                let settled = match joined {
                    Ok(settled) => settled,
                    Err(join_err) => {
                        error!(%join_err, "subscribe task failed");
                        self.set_phase(Phase::SubscriptionFailed);
                        return Err(SubscriptionOutcome::PlatformError {
                            kind: PlatformErrorKind::Native("TaskFailure".to_string()),
                            message: join_err.to_string(),
                        });
                    }
                };
                match settled {
                    Ok(record) => {
                        info!(
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            endpoint = %record.endpoint,
                            "subscription created"
                        );
                        Ok(record)
                    }
                    Err(err) if err.is_key_rejection() => {
                        error!(%err, "platform rejected the application server key");
                        self.set_phase(Phase::SubscriptionFailed);
                        Err(SubscriptionOutcome::PlatformError {
                            kind: PlatformErrorKind::InvalidKey,
                            message: "VAPID key is invalid or incorrectly formatted. Check \
                                      the configured public key."
                                .to_string(),
                        })
                    }
                    Err(err) => {
                        error!(%err, "subscribe call rejected");
                        self.set_phase(Phase::SubscriptionFailed);
                        Err(SubscriptionOutcome::PlatformError {
                            kind: PlatformErrorKind::Native(err.name),
                            message: err.message,
                        })
                    }
                }
            }
            _ = sleep(Duration::from_millis(budget_ms)) => {
                warn!(budget_ms, "subscribe call did not settle within budget");
                self.set_phase(Phase::SubscriptionFailed);
                Err(SubscriptionOutcome::TimedOut {
                    after_ms: budget_ms,
                    guidance: profile.timeout_guidance(),
                })
            }
        }
    }

    /// Read-only setup status for the UI.
    pub async fn status(&self) -> SetupStatus {
        let cap = capability::probe(self.hosts.runtime.as_ref());
        if !cap.supported {
            return SetupStatus {
                supported: false,
                permission: self.hosts.permission.current(),
                subscribed: false,
            };
        }
        let subscribed = matches!(
            self.hosts.push.existing_subscription().await,
            Ok(Some(_))
        );
        SetupStatus {
            supported: true,
            permission: self.hosts.permission.current(),
            subscribed,
        }
    }

    /// Remove the platform subscription, then purge the registry.
    ///
    /// When the platform unsubscribe fails the purge is never issued
    /// and the whole operation reports failure.
    pub async fn disable_notifications(&self) -> Result<(), TeardownError> {
        let removed = self.hosts.push.unsubscribe().await?;
        if removed {
            info!("platform subscription removed");
        } else {
            debug!("no platform subscription to remove");
        }
        self.registry.purge_all().await?;
        self.set_phase(Phase::Unregistered);
        Ok(())
    }

    /// Show a local notification, without prompting or subscribing.
    /// Returns `Ok(false)` when notifications are unsupported or
    /// permission is not granted.
    pub async fn show_local_test(&self, title: &str, body: &str) -> Result<bool, HostError> {
        if !self.hosts.runtime.supports_notifications()
            || self.hosts.permission.current() != PermissionState::Granted
        {
            debug!("local test notification suppressed");
            return Ok(false);
        }
        self.hosts
            .notifications
            .show(&NotificationPayload::local(title, body))
            .await?;
        Ok(true)
    }

    /// Ask the backend to deliver a test push. Returns the success flag.
    pub async fn trigger_test_push(&self) -> bool {
        match self.registry.trigger_test().await {
            Ok(()) => true,
            Err(err) => {
                error!(%err, "failed to trigger test push");
                false
            }
        }
    }
}
