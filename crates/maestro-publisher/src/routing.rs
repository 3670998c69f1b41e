//! Pure publication routing for a single channel
//!
//! No I/O happens here. Given a parsed channel and the configured
//! credentials, [`route`] decides which of the three terminal outcomes
//! applies, and the `*_status` functions render the recorded text.
//!
//! ```text
//! Channel::parse ──► Unsupported ──────────────► "Publication to X not supported yet."
//!                └─► known ──► no credentials ──► "... successfully (simulated): <preview>..."
//!                          └─► credentials ─────► publish ──► ok  ──► "Published to X via p (id: ..)"
//!                                                         └─► err ──► "ERROR publishing to X: .."
//! ```

use maestro_core::{Channel, Provider, ProviderCredentials};

/// Number of content characters embedded in a simulated status
pub const PREVIEW_CHARS: usize = 100;

/// Text shared by every simulated status
pub const SIMULATED_MARKER: &str = "successfully (simulated)";

/// Suffix of the unsupported-channel status
pub const UNSUPPORTED_SUFFIX: &str = "not supported yet.";

/// Prefix of a failed real publication
pub const ERROR_MARKER: &str = "ERROR";

/// Publication outcome class for one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// No handler for this identifier
    Unsupported,
    /// Known handler, no usable credentials
    Simulated(Channel),
    /// Known handler with credentials: call the provider
    Real(Channel, Provider),
}

/// Decide the route for a parsed channel
pub fn route(channel: Channel, credentials: &ProviderCredentials) -> Route {
    match channel.provider() {
        None => Route::Unsupported,
        Some(provider) if credentials.is_configured(provider) => Route::Real(channel, provider),
        Some(_) => Route::Simulated(channel),
    }
}

/// First [`PREVIEW_CHARS`] characters of `content`
pub fn preview(content: &str) -> &str {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

/// Status recorded for an unknown channel
pub fn unsupported_status(label: &str) -> String {
    format!("Publication to {} {}", label, UNSUPPORTED_SUFFIX)
}

/// Status recorded when publication is simulated
///
/// `label` is the channel identifier exactly as the caller supplied it.
pub fn simulated_status(channel: Channel, label: &str, content: &str) -> String {
    let preview = preview(content);
    match channel {
        Channel::Instagram | Channel::Facebook => format!(
            "Published to {} {}: {}...",
            label, SIMULATED_MARKER, preview
        ),
        Channel::GoogleAds => format!(
            "Google Ads campaign created {} for: {}...",
            SIMULATED_MARKER, preview
        ),
        Channel::Twitter => format!(
            "Post published to {} {}: {}...",
            label, SIMULATED_MARKER, preview
        ),
        Channel::LinkedIn => format!(
            "Professional post published to {} {}: {}...",
            label, SIMULATED_MARKER, preview
        ),
        Channel::TikTok => format!(
            "Short video published to {} {}: {}...",
            label, SIMULATED_MARKER, preview
        ),
        Channel::YouTube => format!(
            "Video published to {} {}: {}...",
            label, SIMULATED_MARKER, preview
        ),
        Channel::Pinterest => format!(
            "Visual pin published to {} {}: {}...",
            label, SIMULATED_MARKER, preview
        ),
        Channel::Snapchat => format!(
            "Story/Snap published to {} {}: {}...",
            label, SIMULATED_MARKER, preview
        ),
        Channel::Unsupported => unsupported_status(label),
    }
}

/// Status recorded after a confirmed real publication
pub fn published_status(label: &str, provider: Provider, confirmation: &str) -> String {
    format!("Published to {} via {} (id: {})", label, provider, confirmation)
}

/// Status recorded when a real publication fails
pub fn failed_status(label: &str, reason: &str) -> String {
    format!("{} publishing to {}: {}", ERROR_MARKER, label, reason)
}
