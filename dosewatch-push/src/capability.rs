//! Runtime capability probing and browser-family classification.
//!
//! Family classification is string matching over the user-agent value:
//! a best-effort compatibility shim, not a correctness-critical
//! component. It exists to pick timeout budgets and to warn users of
//! families whose push implementation is known to hang.

use tracing::debug;

use crate::host::RuntimeHost;

/// Timeout budget for families with a known-quirky push implementation.
pub const QUIRKY_TIMEOUT_BUDGET_MS: u64 = 15_000;

/// Timeout budget for everything else.
pub const DEFAULT_TIMEOUT_BUDGET_MS: u64 = 10_000;

/// Closed set of recognized browser families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserFamily {
    /// Firefox; its signature token is authoritative.
    Firefox,
    /// Brave, detected by vendor flag or signature token.
    Brave,
    /// Chrome proper (not Edge, Opera, Chromium, or Brave).
    Chrome,
    /// Chromium engine without Chrome branding or a vendor flag.
    UngoogledChromium,
    /// Nothing matched.
    Unknown,
}

impl BrowserFamily {
    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Firefox => "Firefox",
            Self::Brave => "Brave",
            Self::Chrome => "Chrome",
            Self::UngoogledChromium => "Ungoogled Chromium",
            Self::Unknown => "unknown",
        }
    }

    /// Families whose push implementation is known to hang or misbehave.
    pub fn is_quirky(&self) -> bool {
        matches!(self, Self::Brave | Self::UngoogledChromium)
    }
}

/// Behavior adjustments derived from the browser family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuirkFlags {
    /// Present an upfront risk warning before attempting to subscribe.
    pub requires_confirmation: bool,
    /// How long the subscribe call may run before it is abandoned.
    pub timeout_budget_ms: u64,
}

/// Browser identity and quirk profile, derived once per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserProfile {
    /// Classified family.
    pub family: BrowserFamily,
    /// Behavior adjustments for that family.
    pub quirks: QuirkFlags,
}

impl BrowserProfile {
    /// Build the profile for a classified family.
    pub fn from_family(family: BrowserFamily) -> Self {
        let quirky = family.is_quirky();
        Self {
            family,
            quirks: QuirkFlags {
                requires_confirmation: quirky,
                timeout_budget_ms: if quirky {
                    QUIRKY_TIMEOUT_BUDGET_MS
                } else {
                    DEFAULT_TIMEOUT_BUDGET_MS
                },
            },
        }
    }

    /// Recovery advice shown when the subscribe call times out.
    pub fn timeout_guidance(&self) -> String {
        if self.family.is_quirky() {
            format!(
                "{} has known Push API problems and the subscription could not \
                 be created. Chrome or Firefox are recommended for push \
                 notifications.",
                self.family.name()
            )
        } else {
            "The subscription attempt timed out. This may indicate a problem \
             with the browser's Push API implementation. Try again, or use \
             Chrome or Firefox."
                .to_string()
        }
    }
}

/// Probe result: capability verdict plus the session's browser profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    /// Every required capability is present.
    pub supported: bool,
    /// Capabilities that were missing, in probe order.
    pub missing: Vec<&'static str>,
    /// The session's browser profile.
    pub profile: BrowserProfile,
}

/// Classify the browser family from its user-agent value.
///
/// Matching order is significant: a Firefox token is authoritative;
/// then the vendor flag or a Brave token; then Chrome proper; then the
/// bare-Chromium fallback.
pub fn classify(user_agent: &str, vendor_reports_brave: bool) -> BrowserFamily {
    if user_agent.contains("Firefox") {
        return BrowserFamily::Firefox;
    }
    if vendor_reports_brave || user_agent.contains("Brave") {
        return BrowserFamily::Brave;
    }
    let chromium = user_agent.contains("Chromium");
    if user_agent.contains("Chrome")
        && !chromium
        && !user_agent.contains("Edge")
        && !user_agent.contains("Opera")
    {
        return BrowserFamily::Chrome;
    }
    if chromium {
        return BrowserFamily::UngoogledChromium;
    }
    BrowserFamily::Unknown
}

/// Inspect the runtime for notification, background-script, and push
/// support, and fingerprint the browser family.
///
/// Callers must not proceed with the enable flow when `supported` is
/// false.
pub fn probe(runtime: &dyn RuntimeHost) -> Capability {
    let mut missing = Vec::new();
    if !runtime.supports_notifications() {
        missing.push("notifications");
    }
    if !runtime.supports_background_scripts() {
        missing.push("background scripts");
    }
    if !runtime.supports_push() {
        missing.push("push delivery");
    }

    let family = classify(&runtime.user_agent(), runtime.vendor_reports_brave());
    debug!(
        family = family.name(),
        supported = missing.is_empty(),
        "probed runtime capabilities"
    );

    Capability {
        supported: missing.is_empty(),
        missing,
        profile: BrowserProfile::from_family(family),
    }
}
