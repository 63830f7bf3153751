//! End-to-end tests for the subscription lifecycle, driven against
//! recording fakes with a paused clock.

use std::sync::Arc;
use std::time::Duration;

use dosewatch_push::prelude::*;
use dosewatch_push::QUIRKY_TIMEOUT_BUDGET_MS;
use dosewatch_testing::{
    FakeNotificationHost, FakePermissionHost, FakePushHost, FakeRegistrationHost, FakeRuntime,
    FakeUserPrompt, RecordingRegistry,
};

/// Example application server key in URL-safe base64 (65-byte P-256 point).
const VALID_KEY: &str =
    "BNcRdreALRFXTkOOUHK1EtK2wtaz5Ry4YfYCA_0QTpQtUbVlUls0VJXg7A8u-Ts1XbjhazAkj7I99e8QcYP7DkM";

struct World {
    runtime: FakeRuntime,
    permission: Arc<FakePermissionHost>,
    registration: Arc<FakeRegistrationHost>,
    push: Arc<FakePushHost>,
    prompt: Arc<FakeUserPrompt>,
    notifications: Arc<FakeNotificationHost>,
    registry: Arc<RecordingRegistry>,
    vapid_key: Option<String>,
}

impl World {
    fn fresh() -> Self {
        Self {
            runtime: FakeRuntime::fully_capable(),
            permission: Arc::new(FakePermissionHost::new(
                PermissionState::Default,
                PermissionState::Granted,
            )),
            registration: Arc::new(FakeRegistrationHost::new()),
            push: Arc::new(FakePushHost::resolving_after_ms(200)),
            prompt: Arc::new(FakeUserPrompt::accepting()),
            notifications: Arc::new(FakeNotificationHost::new()),
            registry: Arc::new(RecordingRegistry::new()),
            vapid_key: Some(VALID_KEY.to_string()),
        }
    }

    fn coordinator(&self) -> SubscriptionCoordinator {
        let hosts = HostSet {
            runtime: Arc::new(self.runtime.clone()),
            permission: self.permission.clone(),
            registration: self.registration.clone(),
            push: self.push.clone(),
            prompt: self.prompt.clone(),
            notifications: self.notifications.clone(),
        };
        SubscriptionCoordinator::new(hosts, self.registry.clone(), self.vapid_key.clone())
    }
}

// ---------------------------------------------------------------------------
// Scenario A: fresh device, everything succeeds
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_fresh_device_full_flow() {
    let world = World::fresh();
    let coordinator = world.coordinator();

    let outcome = coordinator.enable_notifications().await;

    match outcome {
        SubscriptionOutcome::Active { ref record, ref sync } => {
            assert_eq!(record.endpoint, "https://push.example/device-1");
            assert_eq!(*sync, SyncStatus::Synced);
        }
        other => panic!("expected Active, got {other:?}"),
    }
    assert_eq!(world.permission.prompt_count(), 1);
    assert_eq!(world.registration.register_count(), 1);
    assert_eq!(world.push.subscribe_count(), 1);
    assert_eq!(world.registry.saved().len(), 1);
    assert_eq!(coordinator.phase(), Phase::BackendSynced);
}

// ---------------------------------------------------------------------------
// Scenario B: quirky family, user declines the risk warning
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_quirky_family_decline_makes_no_platform_calls() {
    let mut world = World::fresh();
    world.runtime = FakeRuntime::fully_capable().with_brave_flag();
    world.prompt = Arc::new(FakeUserPrompt::declining());
    let coordinator = world.coordinator();

    let outcome = coordinator.enable_notifications().await;

    assert_eq!(outcome, SubscriptionOutcome::UserDeclined);
    assert!(!outcome.is_retryable());
    assert!(world.prompt.last_message().unwrap().contains("Brave"));
    assert_eq!(world.registration.register_count(), 0);
    assert_eq!(world.permission.prompt_count(), 0);
    assert_eq!(world.push.subscribe_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_quirky_family_accept_proceeds() {
    let mut world = World::fresh();
    world.runtime = FakeRuntime::fully_capable().with_brave_flag();
    let coordinator = world.coordinator();

    let outcome = coordinator.enable_notifications().await;

    assert!(outcome.is_active());
    assert_eq!(world.prompt.prompt_count(), 1);
}

// ---------------------------------------------------------------------------
// Scenario C: subscribe never settles
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_timeout_with_default_budget() {
    let mut world = World::fresh();
    world.push = Arc::new(FakePushHost::never_settling());
    let coordinator = world.coordinator();

    let outcome = coordinator.enable_notifications().await;

    match outcome {
        SubscriptionOutcome::TimedOut { after_ms, ref guidance } => {
            assert_eq!(after_ms, 10_000);
            assert!(guidance.contains("Try again"));
        }
        other => panic!("expected TimedOut, got {other:?}"),
    }
    assert_eq!(coordinator.phase(), Phase::SubscriptionFailed);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_with_quirky_budget_and_guidance() {
    let mut world = World::fresh();
    world.runtime = FakeRuntime::fully_capable().with_brave_flag();
    world.push = Arc::new(FakePushHost::never_settling());
    let coordinator = world.coordinator();

    let outcome = coordinator.enable_notifications().await;

    match outcome {
        SubscriptionOutcome::TimedOut { after_ms, ref guidance } => {
            assert_eq!(after_ms, QUIRKY_TIMEOUT_BUDGET_MS);
            assert!(guidance.contains("Brave"));
            assert!(guidance.contains("recommended"));
        }
        other => panic!("expected TimedOut, got {other:?}"),
    }
}

/// The subscribe race has no cancellation: an attempt that settles
/// after the caller already observed a timeout still lands in the
/// platform store.
#[tokio::test(start_paused = true)]
async fn test_late_resolution_after_timeout_still_updates_store() {
    let mut world = World::fresh();
    world.push = Arc::new(FakePushHost::resolving_after_ms(12_000));
    let coordinator = world.coordinator();

    let outcome = coordinator.enable_notifications().await;
    assert!(matches!(
        outcome,
        SubscriptionOutcome::TimedOut { after_ms: 10_000, .. }
    ));
    assert!(world.push.stored().is_none());

    // Let the detached attempt run to completion.
    tokio::time::sleep(Duration::from_millis(5_000)).await;
    assert!(world.push.stored().is_some());
}

// ---------------------------------------------------------------------------
// Scenario D: existing subscription is reused
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_existing_subscription_returned_without_subscribe() {
    let existing = SubscriptionRecord::new("https://push.example/old", "p", "a");
    let mut world = World::fresh();
    world.permission = Arc::new(FakePermissionHost::new(
        PermissionState::Granted,
        PermissionState::Granted,
    ));
    world.push = Arc::new(FakePushHost::new().with_existing(existing.clone()));
    let coordinator = world.coordinator();

    let outcome = coordinator.enable_notifications().await;

    assert_eq!(
        outcome,
        SubscriptionOutcome::Active {
            record: existing,
            sync: SyncStatus::Skipped,
        }
    );
    assert_eq!(world.push.subscribe_count(), 0);
    assert_eq!(world.permission.prompt_count(), 0);
    assert_eq!(world.registry.save_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_enable_twice_is_idempotent() {
    let world = World::fresh();
    let coordinator = world.coordinator();

    let first = coordinator.enable_notifications().await;
    let second = coordinator.enable_notifications().await;

    assert!(first.is_active());
    assert!(second.is_active());
    assert_eq!(first.record(), second.record());
    // One platform subscribe and one prompt across both calls.
    assert_eq!(world.push.subscribe_count(), 1);
    assert_eq!(world.permission.prompt_count(), 1);
}

// ---------------------------------------------------------------------------
// Capability and permission short-circuits
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_unsupported_runtime_names_missing_capability() {
    let mut world = World::fresh();
    world.runtime = FakeRuntime::fully_capable().without_push();
    let coordinator = world.coordinator();

    let outcome = coordinator.enable_notifications().await;

    match outcome {
        SubscriptionOutcome::Unsupported { ref reason } => {
            assert!(reason.contains("push delivery"));
        }
        other => panic!("expected Unsupported, got {other:?}"),
    }
    assert_eq!(world.registration.register_count(), 0);
}

#[tokio::test]
async fn test_denied_permission_skips_registration() {
    let mut world = World::fresh();
    world.permission = Arc::new(FakePermissionHost::new(
        PermissionState::Denied,
        PermissionState::Granted,
    ));
    let coordinator = world.coordinator();

    let outcome = coordinator.enable_notifications().await;

    assert_eq!(outcome, SubscriptionOutcome::PermissionDenied);
    assert_eq!(world.registration.register_count(), 0);
    assert_eq!(world.permission.prompt_count(), 0);
    assert_eq!(coordinator.phase(), Phase::PermissionDenied);
}

#[tokio::test]
async fn test_prompt_resolving_to_denied_terminates() {
    let mut world = World::fresh();
    world.permission = Arc::new(FakePermissionHost::new(
        PermissionState::Default,
        PermissionState::Denied,
    ));
    let coordinator = world.coordinator();

    let outcome = coordinator.enable_notifications().await;

    assert_eq!(outcome, SubscriptionOutcome::PermissionDenied);
    assert_eq!(world.permission.prompt_count(), 1);
    assert_eq!(world.push.subscribe_count(), 0);
}

#[tokio::test]
async fn test_registration_failure_is_unsupported() {
    let mut world = World::fresh();
    world.registration = Arc::new(
        FakeRegistrationHost::new().failing_with("SecurityError", "origin not secure"),
    );
    let coordinator = world.coordinator();

    let outcome = coordinator.enable_notifications().await;

    assert_eq!(
        outcome,
        SubscriptionOutcome::Unsupported {
            reason: "background-script unavailable".to_string(),
        }
    );
}

// ---------------------------------------------------------------------------
// Key handling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_missing_key_fails_before_subscribe() {
    let mut world = World::fresh();
    world.vapid_key = None;
    let coordinator = world.coordinator();

    let outcome = coordinator.enable_notifications().await;

    assert!(matches!(
        outcome,
        SubscriptionOutcome::PlatformError {
            kind: PlatformErrorKind::MissingVapidKey,
            ..
        }
    ));
    assert_eq!(world.push.subscribe_count(), 0);
}

#[tokio::test]
async fn test_blank_key_counts_as_missing() {
    let mut world = World::fresh();
    world.vapid_key = Some("   ".to_string());
    let coordinator = world.coordinator();

    let outcome = coordinator.enable_notifications().await;

    assert!(matches!(
        outcome,
        SubscriptionOutcome::PlatformError {
            kind: PlatformErrorKind::MissingVapidKey,
            ..
        }
    ));
}

#[tokio::test]
async fn test_malformed_key_fails_before_subscribe() {
    let mut world = World::fresh();
    world.vapid_key = Some("this is !!! not base64url".to_string());
    let coordinator = world.coordinator();

    let outcome = coordinator.enable_notifications().await;

    assert!(matches!(
        outcome,
        SubscriptionOutcome::PlatformError {
            kind: PlatformErrorKind::InvalidKey,
            ..
        }
    ));
    assert_eq!(world.push.subscribe_count(), 0);
}

#[tokio::test]
async fn test_platform_key_rejection_classified_as_invalid_key() {
    let mut world = World::fresh();
    world.push = Arc::new(FakePushHost::rejecting_with(
        "InvalidAccessError",
        "applicationServerKey is not valid",
    ));
    let coordinator = world.coordinator();

    let outcome = coordinator.enable_notifications().await;

    assert!(matches!(
        outcome,
        SubscriptionOutcome::PlatformError {
            kind: PlatformErrorKind::InvalidKey,
            ..
        }
    ));
}

#[tokio::test]
async fn test_other_native_errors_keep_their_name() {
    let mut world = World::fresh();
    world.push = Arc::new(FakePushHost::rejecting_with(
        "NotAllowedError",
        "push service refused",
    ));
    let coordinator = world.coordinator();

    let outcome = coordinator.enable_notifications().await;

    match outcome {
        SubscriptionOutcome::PlatformError {
            kind: PlatformErrorKind::Native(ref name),
            ref message,
        } => {
            assert_eq!(name, "NotAllowedError");
            assert_eq!(message, "push service refused");
        }
        other => panic!("expected native PlatformError, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Backend sync policy
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_registry_failure_does_not_block_active_subscription() {
    let mut world = World::fresh();
    world.registry = Arc::new(RecordingRegistry::new().failing_save(
        BackendSyncError::Response {
            status: 500,
            detail: "registry down".to_string(),
        },
    ));
    let coordinator = world.coordinator();

    let outcome = coordinator.enable_notifications().await;

    match outcome {
        SubscriptionOutcome::Active { ref record, ref sync } => {
            assert_eq!(record.endpoint, "https://push.example/device-1");
            assert!(matches!(sync, SyncStatus::Failed(_)));
        }
        other => panic!("expected Active with failed sync, got {other:?}"),
    }
    assert_eq!(world.registry.save_count(), 1);
    assert_eq!(coordinator.phase(), Phase::BackendSyncFailed);
}

// ---------------------------------------------------------------------------
// Teardown
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_disable_unsubscribes_then_purges() {
    let existing = SubscriptionRecord::new("https://push.example/old", "p", "a");
    let mut world = World::fresh();
    world.push = Arc::new(FakePushHost::new().with_existing(existing));
    let coordinator = world.coordinator();

    coordinator.disable_notifications().await.unwrap();

    assert!(world.push.stored().is_none());
    assert_eq!(world.registry.purge_count(), 1);
}

#[tokio::test]
async fn test_unsubscribe_failure_suppresses_purge() {
    let mut world = World::fresh();
    world.push = Arc::new(
        FakePushHost::new().failing_unsubscribe("AbortError", "store unavailable"),
    );
    let coordinator = world.coordinator();

    let err = coordinator.disable_notifications().await.unwrap_err();

    assert!(matches!(err, TeardownError::Platform(_)));
    assert_eq!(world.registry.purge_count(), 0);
}

// ---------------------------------------------------------------------------
// Status and test helpers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_status_reflects_store_and_permission() {
    let mut world = World::fresh();
    world.permission = Arc::new(FakePermissionHost::new(
        PermissionState::Granted,
        PermissionState::Granted,
    ));
    world.push = Arc::new(
        FakePushHost::new().with_existing(SubscriptionRecord::new("https://p.example/x", "p", "a")),
    );
    let coordinator = world.coordinator();

    let status = coordinator.status().await;
    assert!(status.supported);
    assert_eq!(status.permission, PermissionState::Granted);
    assert!(status.subscribed);
}

#[tokio::test]
async fn test_status_on_unsupported_runtime() {
    let mut world = World::fresh();
    world.runtime = FakeRuntime::fully_capable().without_notifications();
    let coordinator = world.coordinator();

    let status = coordinator.status().await;
    assert!(!status.supported);
    assert!(!status.subscribed);
}

#[tokio::test]
async fn test_local_test_notification_requires_granted_permission() {
    let mut world = World::fresh();
    world.permission = Arc::new(FakePermissionHost::new(
        PermissionState::Default,
        PermissionState::Granted,
    ));
    let coordinator = world.coordinator();

    // Not granted yet: suppressed, and no prompt is issued.
    assert!(!coordinator.show_local_test("Test", "body").await.unwrap());
    assert_eq!(world.permission.prompt_count(), 0);
    assert!(world.notifications.shown().is_empty());
}

#[tokio::test]
async fn test_local_test_notification_shows_when_granted() {
    let mut world = World::fresh();
    world.permission = Arc::new(FakePermissionHost::new(
        PermissionState::Granted,
        PermissionState::Granted,
    ));
    let coordinator = world.coordinator();

    assert!(coordinator.show_local_test("Test", "body").await.unwrap());
    let shown = world.notifications.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, "Test");
    assert!(!shown[0].require_interaction);
}

#[tokio::test]
async fn test_trigger_test_push_reports_flag() {
    let world = World::fresh();
    let coordinator = world.coordinator();
    assert!(coordinator.trigger_test_push().await);
    assert_eq!(world.registry.test_count(), 1);

    let mut failing = World::fresh();
    failing.registry = Arc::new(
        RecordingRegistry::new().failing_test(BackendSyncError::Network("refused".into())),
    );
    let coordinator = failing.coordinator();
    assert!(!coordinator.trigger_test_push().await);
}
