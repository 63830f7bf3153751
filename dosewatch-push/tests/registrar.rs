//! Background-script registration tests.

use dosewatch_push::register_and_wait_ready;
use dosewatch_testing::{FakeRegistrationHost, FakeRuntime};

#[tokio::test]
async fn test_registers_and_returns_handle() {
    let runtime = FakeRuntime::fully_capable();
    let host = FakeRegistrationHost::new();
    let handle = register_and_wait_ready(&runtime, &host).await.unwrap();
    assert!(handle.is_some());
    assert_eq!(host.register_count(), 1);
}

#[tokio::test]
async fn test_unsupported_runtime_yields_none_without_install() {
    let runtime = FakeRuntime::fully_capable().without_background_scripts();
    let host = FakeRegistrationHost::new();
    let handle = register_and_wait_ready(&runtime, &host).await.unwrap();
    assert!(handle.is_none());
    assert_eq!(host.register_count(), 0);
}

#[tokio::test]
async fn test_install_failure_propagates() {
    let runtime = FakeRuntime::fully_capable();
    let host = FakeRegistrationHost::new().failing_with("SecurityError", "origin not secure");
    let err = register_and_wait_ready(&runtime, &host).await.unwrap_err();
    assert_eq!(err.name, "SecurityError");
}
