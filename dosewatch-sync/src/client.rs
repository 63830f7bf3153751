//! Registry client implementation.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use dosewatch_push::{BackendSyncError, SubscriptionRecord, SubscriptionRegistry};

use crate::SyncClientConfig;

/// Path that accepts new subscription records.
pub const SAVE_PATH: &str = "/api/push-subscriptions/";

/// Path that purges every record for the caller's identity.
pub const PURGE_PATH: &str = "/api/push-subscriptions/purge/";

/// Path that triggers a test push.
pub const TEST_PATH: &str = "/api/send-test-push/";

/// Error body shape the backend uses for failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// HTTP client for the backend subscription registry.
///
/// Each operation is a single round trip with no retry; a failure is
/// reported as a [`BackendSyncError`] and never rolls back platform
/// state.
#[derive(Clone)]
pub struct BackendSyncClient {
    inner: reqwest::Client,
    config: SyncClientConfig,
}

impl BackendSyncClient {
    /// Create a new registry client.
    pub fn new(config: SyncClientConfig) -> Result<Self, BackendSyncError> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|err| BackendSyncError::Config(err.to_string()))?;

        Ok(Self { inner, config })
    }

    /// Create a client with default configuration.
    pub fn default_client() -> Result<Self, BackendSyncError> {
        Self::new(SyncClientConfig::default())
    }

    /// The client configuration.
    pub fn config(&self) -> &SyncClientConfig {
        &self.config
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Persist a subscription record.
    ///
    /// Wire shape: `{ "subscription": { "endpoint": ..., "keys": ... } }`.
    pub async fn save(&self, record: &SubscriptionRecord) -> Result<(), BackendSyncError> {
        debug!(endpoint = %record.endpoint, "mirroring subscription to registry");
        let body = serde_json::json!({ "subscription": record });
        let response = self
            .inner
            .post(self.url(SAVE_PATH))
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;
        Self::check(response).await
    }

    /// Remove every subscription record for the caller's identity.
    pub async fn purge_all(&self) -> Result<(), BackendSyncError> {
        debug!("purging subscription records from registry");
        let response = self
            .inner
            .delete(self.url(PURGE_PATH))
            .send()
            .await
            .map_err(map_transport_error)?;
        Self::check(response).await
    }

    /// Ask the backend to deliver a test push.
    pub async fn trigger_test(&self) -> Result<(), BackendSyncError> {
        debug!("triggering test push");
        let response = self
            .inner
            .post(self.url(TEST_PATH))
            .send()
            .await
            .map_err(map_transport_error)?;
        Self::check(response).await
    }

    /// Turn a non-success response into an error carrying the server's
    /// detail when the body provides one.
    async fn check(response: reqwest::Response) -> Result<(), BackendSyncError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let fallback = status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
        let detail = match response.text().await {
            Ok(body) => match serde_json::from_str::<ErrorBody>(&body) {
                Ok(parsed) => parsed.detail,
                Err(_) if !body.trim().is_empty() => body.trim().to_string(),
                Err(_) => fallback,
            },
            Err(_) => fallback,
        };

        Err(BackendSyncError::Response {
            status: status.as_u16(),
            detail,
        })
    }
}

fn map_transport_error(err: reqwest::Error) -> BackendSyncError {
    if err.is_timeout() {
        BackendSyncError::Timeout
    } else {
        BackendSyncError::Network(err.to_string())
    }
}

#[async_trait]
impl SubscriptionRegistry for BackendSyncClient {
    async fn save(&self, record: &SubscriptionRecord) -> Result<(), BackendSyncError> {
        BackendSyncClient::save(self, record).await
    }

    async fn purge_all(&self) -> Result<(), BackendSyncError> {
        BackendSyncClient::purge_all(self).await
    }

    async fn trigger_test(&self) -> Result<(), BackendSyncError> {
        BackendSyncClient::trigger_test(self).await
    }
}
