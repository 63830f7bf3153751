//! Recording fake for the backend registry.

use std::sync::Mutex;

use async_trait::async_trait;

use dosewatch_push::{BackendSyncError, SubscriptionRecord, SubscriptionRegistry};

/// In-memory registry recording every call.
pub struct RecordingRegistry {
    saved: Mutex<Vec<SubscriptionRecord>>,
    save_attempts: Mutex<u32>,
    purges: Mutex<u32>,
    tests: Mutex<u32>,
    save_failure: Option<BackendSyncError>,
    purge_failure: Option<BackendSyncError>,
    test_failure: Option<BackendSyncError>,
}

impl RecordingRegistry {
    /// Registry that accepts every call.
    pub fn new() -> Self {
        Self {
            saved: Mutex::new(Vec::new()),
            save_attempts: Mutex::new(0),
            purges: Mutex::new(0),
            tests: Mutex::new(0),
            save_failure: None,
            purge_failure: None,
            test_failure: None,
        }
    }

    /// Make `save` fail with the given error.
    pub fn failing_save(mut self, error: BackendSyncError) -> Self {
        self.save_failure = Some(error);
        self
    }

    /// Make `purge_all` fail with the given error.
    pub fn failing_purge(mut self, error: BackendSyncError) -> Self {
        self.purge_failure = Some(error);
        self
    }

    /// Make `trigger_test` fail with the given error.
    pub fn failing_test(mut self, error: BackendSyncError) -> Self {
        self.test_failure = Some(error);
        self
    }

    /// Every record accepted, in order.
    pub fn saved(&self) -> Vec<SubscriptionRecord> {
        self.saved.lock().unwrap().clone()
    }

    /// How many save calls were attempted, including failed ones.
    pub fn save_count(&self) -> u32 {
        *self.save_attempts.lock().unwrap()
    }

    /// How many purge calls were attempted.
    pub fn purge_count(&self) -> u32 {
        *self.purges.lock().unwrap()
    }

    /// How many test triggers were attempted.
    pub fn test_count(&self) -> u32 {
        *self.tests.lock().unwrap()
    }
}

impl Default for RecordingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubscriptionRegistry for RecordingRegistry {
    async fn save(&self, record: &SubscriptionRecord) -> Result<(), BackendSyncError> {
        *self.save_attempts.lock().unwrap() += 1;
        if let Some(err) = &self.save_failure {
            return Err(err.clone());
        }
        self.saved.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn purge_all(&self) -> Result<(), BackendSyncError> {
        if let Some(err) = &self.purge_failure {
            return Err(err.clone());
        }
        *self.purges.lock().unwrap() += 1;
        Ok(())
    }

    async fn trigger_test(&self) -> Result<(), BackendSyncError> {
        if let Some(err) = &self.test_failure {
            return Err(err.clone());
        }
        *self.tests.lock().unwrap() += 1;
        Ok(())
    }
}
