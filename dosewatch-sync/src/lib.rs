//! # DoseWatch Sync
//!
//! HTTP client for the backend subscription registry. The registry is
//! a mirror of the platform subscription store: every call here is a
//! single round trip with no retry, and no failure on this surface
//! blocks local notification delivery.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dosewatch_sync::{BackendSyncClient, SyncClientConfig};
//!
//! let client = BackendSyncClient::new(
//!     SyncClientConfig::builder()
//!         .base_url("https://api.dosewatch.example")
//!         .build(),
//! )?;
//!
//! client.save(&record).await?;
//! ```

mod client;
mod config;

pub use client::{BackendSyncClient, PURGE_PATH, SAVE_PATH, TEST_PATH};
pub use config::{SyncClientConfig, SyncClientConfigBuilder};
