//! Notification payload construction.

use serde::{Deserialize, Serialize};

/// Title used when a push payload carries none.
pub const DEFAULT_TITLE: &str = "DoseWatch";

/// Body used when a push payload carries none.
pub const DEFAULT_BODY: &str = "Time for your medication dose";

/// Tag grouping every reminder under one replaceable notification slot.
pub const DEFAULT_TAG: &str = "medication-reminder";

/// Icon shown on reminder notifications.
pub const ICON_PATH: &str = "/icon-192x192.png";

/// Badge shown on reminder notifications.
pub const BADGE_PATH: &str = "/badge-72x72.png";

/// Action identifier that opens the application.
pub const ACTION_OPEN: &str = "open";

/// Action identifier that dismisses the notification.
pub const ACTION_CLOSE: &str = "close";

/// A button rendered on a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    /// Action identifier reported back on click.
    pub action: String,
    /// Button label.
    pub title: String,
}

impl NotificationAction {
    /// Create a new action button.
    pub fn new(action: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            title: title.into(),
        }
    }
}

/// Rendering options for one notification. Transient, constructed per
/// push event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
    /// Icon path.
    pub icon: String,
    /// Badge path.
    pub badge: String,
    /// Replaceable-slot tag.
    pub tag: String,
    /// Keep the notification visible until the user dismisses it.
    pub require_interaction: bool,
    /// Action buttons, in order.
    pub actions: Vec<NotificationAction>,
}

/// Fields a backend push payload may carry. Everything is optional;
/// absent fields get fixed defaults.
#[derive(Debug, Default, Deserialize)]
struct WirePayload {
    title: Option<String>,
    body: Option<String>,
    tag: Option<String>,
}

impl NotificationPayload {
    /// Build a reminder notification with the standard action buttons
    /// and `require_interaction` set so it persists until dismissed.
    pub fn reminder(
        title: impl Into<String>,
        body: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            icon: ICON_PATH.to_string(),
            badge: BADGE_PATH.to_string(),
            tag: tag.into(),
            require_interaction: true,
            actions: vec![
                NotificationAction::new(ACTION_OPEN, "Open app"),
                NotificationAction::new(ACTION_CLOSE, "Close"),
            ],
        }
    }

    /// Build a local test notification. No action buttons, does not
    /// persist.
    pub fn local(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            icon: ICON_PATH.to_string(),
            badge: BADGE_PATH.to_string(),
            tag: DEFAULT_TAG.to_string(),
            require_interaction: false,
            actions: Vec::new(),
        }
    }

    /// Construct the reminder for a raw push payload.
    ///
    /// A structured payload is parsed for `title`/`body`/`tag`; any
    /// non-object or unparseable payload falls back to treating the raw
    /// bytes as the plain-text body.
    pub fn from_push_data(data: &[u8]) -> Self {
        match serde_json::from_slice::<serde_json::Value>(data) {
            Ok(value) => {
                let wire = serde_json::from_value::<WirePayload>(value).unwrap_or_default();
                Self::reminder(
                    wire.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                    wire.body.unwrap_or_else(|| DEFAULT_BODY.to_string()),
                    wire.tag.unwrap_or_else(|| DEFAULT_TAG.to_string()),
                )
            }
            Err(_) => {
                let text = String::from_utf8_lossy(data).trim().to_string();
                let body = if text.is_empty() {
                    DEFAULT_BODY.to_string()
                } else {
                    text
                };
                Self::reminder(DEFAULT_TITLE, body, DEFAULT_TAG)
            }
        }
    }
}
