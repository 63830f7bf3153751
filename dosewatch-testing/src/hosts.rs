//! Fake platform hosts.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use dosewatch_push::{
    CacheHost, ClientsHost, HostError, NotificationHost, NotificationPayload, PermissionHost,
    PermissionState, PushHost, RegistrationHandle, RegistrationHost, RuntimeHost,
    SubscriptionRecord, UserPrompt,
};

const CHROME_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

/// Fake runtime with configurable capabilities and identity.
#[derive(Clone)]
pub struct FakeRuntime {
    notifications: bool,
    background_scripts: bool,
    push: bool,
    user_agent: String,
    brave_flag: bool,
}

impl FakeRuntime {
    /// Runtime with every capability, presenting a Chrome user agent.
    pub fn fully_capable() -> Self {
        Self {
            notifications: true,
            background_scripts: true,
            push: true,
            user_agent: CHROME_UA.to_string(),
            brave_flag: false,
        }
    }

    /// Remove notification support.
    pub fn without_notifications(mut self) -> Self {
        self.notifications = false;
        self
    }

    /// Remove background-script support.
    pub fn without_background_scripts(mut self) -> Self {
        self.background_scripts = false;
        self
    }

    /// Remove push-delivery support.
    pub fn without_push(mut self) -> Self {
        self.push = false;
        self
    }

    /// Present a different user agent.
    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    /// Raise the Brave vendor flag.
    pub fn with_brave_flag(mut self) -> Self {
        self.brave_flag = true;
        self
    }
}

impl RuntimeHost for FakeRuntime {
    fn supports_notifications(&self) -> bool {
        self.notifications
    }

    fn supports_background_scripts(&self) -> bool {
        self.background_scripts
    }

    fn supports_push(&self) -> bool {
        self.push
    }

    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn vendor_reports_brave(&self) -> bool {
        self.brave_flag
    }
}

/// Fake permission surface with a scripted prompt answer.
pub struct FakePermissionHost {
    state: Mutex<PermissionState>,
    prompt_answer: PermissionState,
    prompts: Mutex<u32>,
}

impl FakePermissionHost {
    /// Start in `current` and answer any prompt with `prompt_answer`.
    pub fn new(current: PermissionState, prompt_answer: PermissionState) -> Self {
        Self {
            state: Mutex::new(current),
            prompt_answer,
            prompts: Mutex::new(0),
        }
    }

    /// How many prompts were issued.
    pub fn prompt_count(&self) -> u32 {
        *self.prompts.lock().unwrap()
    }
}

#[async_trait]
impl PermissionHost for FakePermissionHost {
    fn current(&self) -> PermissionState {
        *self.state.lock().unwrap()
    }

    async fn request(&self) -> Result<PermissionState, HostError> {
        *self.prompts.lock().unwrap() += 1;
        *self.state.lock().unwrap() = self.prompt_answer;
        Ok(self.prompt_answer)
    }
}

/// Fake background-script registry.
pub struct FakeRegistrationHost {
    failure: Option<(String, String)>,
    registrations: Mutex<u32>,
}

impl FakeRegistrationHost {
    /// Registry that installs successfully.
    pub fn new() -> Self {
        Self {
            failure: None,
            registrations: Mutex::new(0),
        }
    }

    /// Make installation fail with the given native error.
    pub fn failing_with(mut self, name: &str, message: &str) -> Self {
        self.failure = Some((name.to_string(), message.to_string()));
        self
    }

    /// How many installs were attempted.
    pub fn register_count(&self) -> u32 {
        *self.registrations.lock().unwrap()
    }
}

impl Default for FakeRegistrationHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistrationHost for FakeRegistrationHost {
    async fn register(&self, _script_url: &str) -> Result<(), HostError> {
        *self.registrations.lock().unwrap() += 1;
        match &self.failure {
            Some((name, message)) => Err(HostError::new(name, message)),
            None => Ok(()),
        }
    }

    async fn ready(&self) -> Result<RegistrationHandle, HostError> {
        Ok(RegistrationHandle {
            scope: "/".to_string(),
        })
    }
}

/// Scripted behavior for the fake subscribe call.
#[derive(Clone)]
enum SubscribeBehavior {
    Resolve { after_ms: u64 },
    Reject { name: String, message: String },
    Never,
}

/// Fake platform subscription store.
///
/// The store itself stays consistent even when a subscribe attempt
/// outlives its caller's timeout, mirroring the real platform.
pub struct FakePushHost {
    behavior: SubscribeBehavior,
    store: Mutex<Option<SubscriptionRecord>>,
    subscribes: Mutex<u32>,
    unsubscribe_failure: Option<(String, String)>,
}

impl FakePushHost {
    /// Store whose subscribe resolves immediately.
    pub fn new() -> Self {
        Self::resolving_after_ms(0)
    }

    /// Store whose subscribe resolves after the given delay.
    pub fn resolving_after_ms(after_ms: u64) -> Self {
        Self {
            behavior: SubscribeBehavior::Resolve { after_ms },
            store: Mutex::new(None),
            subscribes: Mutex::new(0),
            unsubscribe_failure: None,
        }
    }

    /// Store whose subscribe rejects with a native error.
    pub fn rejecting_with(name: &str, message: &str) -> Self {
        Self {
            behavior: SubscribeBehavior::Reject {
                name: name.to_string(),
                message: message.to_string(),
            },
            store: Mutex::new(None),
            subscribes: Mutex::new(0),
            unsubscribe_failure: None,
        }
    }

    /// Store whose subscribe never settles.
    pub fn never_settling() -> Self {
        Self {
            behavior: SubscribeBehavior::Never,
            store: Mutex::new(None),
            subscribes: Mutex::new(0),
            unsubscribe_failure: None,
        }
    }

    /// Pre-seed the store with an existing subscription.
    pub fn with_existing(self, record: SubscriptionRecord) -> Self {
        *self.store.lock().unwrap() = Some(record);
        self
    }

    /// Make unsubscribe fail with the given native error.
    pub fn failing_unsubscribe(mut self, name: &str, message: &str) -> Self {
        self.unsubscribe_failure = Some((name.to_string(), message.to_string()));
        self
    }

    /// How many subscribe calls reached the platform.
    pub fn subscribe_count(&self) -> u32 {
        *self.subscribes.lock().unwrap()
    }

    /// What the platform store currently holds.
    pub fn stored(&self) -> Option<SubscriptionRecord> {
        self.store.lock().unwrap().clone()
    }
}

impl Default for FakePushHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PushHost for FakePushHost {
    async fn existing_subscription(&self) -> Result<Option<SubscriptionRecord>, HostError> {
        Ok(self.store.lock().unwrap().clone())
    }

    async fn subscribe(
        &self,
        _application_server_key: Vec<u8>,
    ) -> Result<SubscriptionRecord, HostError> {
        *self.subscribes.lock().unwrap() += 1;
        match self.behavior.clone() {
            SubscribeBehavior::Resolve { after_ms } => {
                if after_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(after_ms)).await;
                }
                let record =
                    SubscriptionRecord::new("https://push.example/device-1", "p256dh-key", "auth-key");
                *self.store.lock().unwrap() = Some(record.clone());
                Ok(record)
            }
            SubscribeBehavior::Reject { name, message } => Err(HostError::new(name, message)),
            SubscribeBehavior::Never => std::future::pending().await,
        }
    }

    async fn unsubscribe(&self) -> Result<bool, HostError> {
        if let Some((name, message)) = &self.unsubscribe_failure {
            return Err(HostError::new(name, message));
        }
        Ok(self.store.lock().unwrap().take().is_some())
    }
}

/// Fake confirmation dialog with a scripted answer.
pub struct FakeUserPrompt {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl FakeUserPrompt {
    /// Dialog that accepts every confirmation.
    pub fn accepting() -> Self {
        Self {
            answer: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Dialog that declines every confirmation.
    pub fn declining() -> Self {
        Self {
            answer: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// How many confirmations were presented.
    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// The most recent confirmation message.
    pub fn last_message(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl UserPrompt for FakeUserPrompt {
    async fn confirm(&self, message: &str) -> bool {
        self.prompts.lock().unwrap().push(message.to_string());
        self.answer
    }
}

/// Fake notification display recording everything shown and dismissed.
pub struct FakeNotificationHost {
    shown: Arc<Mutex<Vec<NotificationPayload>>>,
    dismissed: Arc<Mutex<Vec<String>>>,
}

impl FakeNotificationHost {
    /// Empty display surface.
    pub fn new() -> Self {
        Self {
            shown: Arc::new(Mutex::new(Vec::new())),
            dismissed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every payload shown, in order.
    pub fn shown(&self) -> Vec<NotificationPayload> {
        self.shown.lock().unwrap().clone()
    }

    /// Every dismissed tag, in order.
    pub fn dismissed(&self) -> Vec<String> {
        self.dismissed.lock().unwrap().clone()
    }
}

impl Default for FakeNotificationHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationHost for FakeNotificationHost {
    async fn show(&self, payload: &NotificationPayload) -> Result<(), HostError> {
        self.shown.lock().unwrap().push(payload.clone());
        Ok(())
    }

    async fn dismiss(&self, tag: &str) -> Result<(), HostError> {
        self.dismissed.lock().unwrap().push(tag.to_string());
        Ok(())
    }
}

/// Fake cache store keyed by generation name.
pub struct FakeCacheHost {
    caches: Mutex<BTreeMap<String, Vec<String>>>,
}

impl FakeCacheHost {
    /// Empty cache store.
    pub fn new() -> Self {
        Self {
            caches: Mutex::new(BTreeMap::new()),
        }
    }

    /// Seed an (empty) cache generation, as a previous version left it.
    pub fn seed_cache(&self, name: &str) {
        self.caches
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default();
    }

    /// Assets held by the named cache.
    pub fn cached_assets(&self, name: &str) -> Option<Vec<String>> {
        self.caches.lock().unwrap().get(name).cloned()
    }

    /// Names of every live cache, sorted.
    pub fn names(&self) -> Vec<String> {
        self.caches.lock().unwrap().keys().cloned().collect()
    }
}

impl Default for FakeCacheHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheHost for FakeCacheHost {
    async fn open_and_fill(&self, cache_name: &str, assets: &[&str]) -> Result<(), HostError> {
        self.caches.lock().unwrap().insert(
            cache_name.to_string(),
            assets.iter().map(|a| a.to_string()).collect(),
        );
        Ok(())
    }

    async fn cache_names(&self) -> Result<Vec<String>, HostError> {
        Ok(self.names())
    }

    async fn delete_cache(&self, cache_name: &str) -> Result<bool, HostError> {
        Ok(self.caches.lock().unwrap().remove(cache_name).is_some())
    }
}

/// Fake page-control surface.
pub struct FakeClientsHost {
    skipped: Mutex<bool>,
    claimed: Mutex<bool>,
    opened: Mutex<u32>,
}

impl FakeClientsHost {
    /// Fresh surface with nothing recorded.
    pub fn new() -> Self {
        Self {
            skipped: Mutex::new(false),
            claimed: Mutex::new(false),
            opened: Mutex::new(0),
        }
    }

    /// `skip_waiting` was called.
    pub fn skipped_waiting(&self) -> bool {
        *self.skipped.lock().unwrap()
    }

    /// `claim` was called.
    pub fn claimed(&self) -> bool {
        *self.claimed.lock().unwrap()
    }

    /// The root view was opened at least once.
    pub fn opened_root(&self) -> bool {
        *self.opened.lock().unwrap() > 0
    }
}

impl Default for FakeClientsHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClientsHost for FakeClientsHost {
    async fn skip_waiting(&self) -> Result<(), HostError> {
        *self.skipped.lock().unwrap() = true;
        Ok(())
    }

    async fn claim(&self) -> Result<(), HostError> {
        *self.claimed.lock().unwrap() = true;
        Ok(())
    }

    async fn open_root(&self) -> Result<(), HostError> {
        *self.opened.lock().unwrap() += 1;
        Ok(())
    }
}
