//! Background-script event dispatch.
//!
//! The background script runs in its own context with no shared memory
//! with the page; it communicates only through the platform's push and
//! message channels. Its handlers form a fixed dispatch set keyed by
//! event kind, each awaited to completion so the platform does not
//! tear the script down mid-handler.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::HostError;
use crate::host::{CacheHost, ClientsHost, NotificationHost};
use crate::notification::{ACTION_OPEN, NotificationPayload};

/// Current cache generation. On activation every cache with a
/// different name is deleted, so exactly one generation is live.
pub const CACHE_NAME: &str = "dosewatch-v1";

/// Minimal offline shell pre-warmed on install.
pub const SHELL_ASSETS: &[&str] = &["/", "/index.html"];

/// Events delivered to the background script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptEvent {
    /// The script was installed.
    Install,
    /// The script became the active generation.
    Activate,
    /// A push message arrived; the payload is opaque bytes.
    Push(Vec<u8>),
    /// The user clicked a notification.
    NotificationClick {
        /// Tag of the clicked notification.
        tag: String,
        /// Invoked action, or `None` for a click on the body.
        action: Option<String>,
    },
}

/// The background script: cache warm-up, push-driven reminders, and
/// click routing.
pub struct BackgroundScript {
    caches: Arc<dyn CacheHost>,
    notifications: Arc<dyn NotificationHost>,
    clients: Arc<dyn ClientsHost>,
}

impl BackgroundScript {
    /// Create the script over its host surfaces.
    pub fn new(
        caches: Arc<dyn CacheHost>,
        notifications: Arc<dyn NotificationHost>,
        clients: Arc<dyn ClientsHost>,
    ) -> Self {
        Self {
            caches,
            notifications,
            clients,
        }
    }

    /// Dispatch one event to its handler and await completion.
    pub async fn dispatch(&self, event: ScriptEvent) -> Result<(), HostError> {
        match event {
            ScriptEvent::Install => self.on_install().await,
            ScriptEvent::Activate => self.on_activate().await,
            ScriptEvent::Push(data) => self.on_push(&data).await,
            ScriptEvent::NotificationClick { tag, action } => {
                self.on_notification_click(&tag, action.as_deref()).await
            }
        }
    }

    /// Pre-warm the current cache generation with the offline shell,
    /// then activate without waiting for old instances.
    async fn on_install(&self) -> Result<(), HostError> {
        debug!(cache = CACHE_NAME, "pre-warming offline shell");
        self.caches.open_and_fill(CACHE_NAME, SHELL_ASSETS).await?;
        self.clients.skip_waiting().await
    }

    /// Delete every stale cache generation, then claim open pages.
    async fn on_activate(&self) -> Result<(), HostError> {
        for name in self.caches.cache_names().await? {
            if name != CACHE_NAME {
                debug!(cache = %name, "deleting stale cache generation");
                self.caches.delete_cache(&name).await?;
            }
        }
        self.clients.claim().await
    }

    /// Render the reminder for a push payload. The display is awaited.
    async fn on_push(&self, data: &[u8]) -> Result<(), HostError> {
        let payload = NotificationPayload::from_push_data(data);
        info!(title = %payload.title, tag = %payload.tag, "showing reminder notification");
        self.notifications.show(&payload).await
    }

    /// Dismiss the clicked notification and route the tap. The open
    /// action, or a click on the body, opens (or focuses) the root
    /// view; anything else ends with the dismissal.
    async fn on_notification_click(
        &self,
        tag: &str,
        action: Option<&str>,
    ) -> Result<(), HostError> {
        self.notifications.dismiss(tag).await?;
        match action {
            None => self.clients.open_root().await,
            Some(a) if a == ACTION_OPEN => self.clients.open_root().await,
            Some(other) => {
                debug!(action = other, "notification dismissed without navigation");
                Ok(())
            }
        }
    }
}

