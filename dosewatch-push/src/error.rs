//! Error types for the subscription lifecycle.

use thiserror::Error;

/// Error raised by a platform host call.
///
/// Carries the platform's native error name and message so callers can
/// classify faults without depending on platform error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name}: {message}")]
pub struct HostError {
    /// Native error name (e.g. `InvalidAccessError`, `NotAllowedError`).
    pub name: String,
    /// Native error message.
    pub message: String,
}

impl HostError {
    /// Create a new host error.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Whether this is the platform's rejection of a malformed
    /// application server key.
    pub fn is_key_rejection(&self) -> bool {
        self.name == "InvalidAccessError"
    }
}

/// Server public key decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The key is not well-formed base64url.
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),
}

/// Backend registry errors.
///
/// Registry writes are a single round trip with no retry; a failure
/// never blocks local notification capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendSyncError {
    /// The registry rejected the request.
    #[error("Registry rejected the request: {status} - {detail}")]
    Response {
        /// HTTP status code.
        status: u16,
        /// Server-provided detail when available, otherwise the status
        /// reason.
        detail: String,
    },

    /// The registry could not be reached.
    #[error("Registry unreachable: {0}")]
    Network(String),

    /// The request timed out.
    #[error("Registry request timed out")]
    Timeout,

    /// Request or response body could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The client could not be constructed.
    #[error("Registry client configuration error: {0}")]
    Config(String),
}

impl BackendSyncError {
    /// Whether retrying the same call could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::Response { status, .. } => *status >= 500 || *status == 429,
            Self::Serialization(_) | Self::Config(_) => false,
        }
    }
}

/// Errors from the teardown flow (platform unsubscribe then registry purge).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TeardownError {
    /// The platform unsubscribe call failed. The registry purge is not
    /// issued in this case.
    #[error("Platform unsubscribe failed: {0}")]
    Platform(#[from] HostError),

    /// The registry purge failed after the platform subscription was
    /// already removed.
    #[error("Registry purge failed: {0}")]
    Registry(#[from] BackendSyncError),
}
