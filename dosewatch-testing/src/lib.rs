//! Recording fakes for the DoseWatch host traits.
//!
//! Every fake records the calls made against it so tests can assert
//! not just outcomes but which platform surfaces were touched: "no
//! second subscribe call", "permission never prompted", "purge never
//! issued".

mod hosts;
mod registry;

pub use hosts::{
    FakeCacheHost, FakeClientsHost, FakeNotificationHost, FakePermissionHost, FakePushHost,
    FakeRegistrationHost, FakeRuntime, FakeUserPrompt,
};
pub use registry::RecordingRegistry;
