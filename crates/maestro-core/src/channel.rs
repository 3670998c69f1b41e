//! Channel vocabulary and provider families
//!
//! Every channel identifier in a brief is parsed exactly once into a
//! [`Channel`]. Template resolution and publication dispatch both match on
//! this closed set, so adding a channel is a compile-checked change.

/// Target platform for a piece of campaign content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Instagram,
    Facebook,
    GoogleAds,
    Twitter,
    LinkedIn,
    TikTok,
    YouTube,
    Pinterest,
    Snapchat,
    /// Any identifier outside the known vocabulary
    Unsupported,
}

impl Channel {
    /// All channels Maestro knows how to handle
    pub const KNOWN: [Channel; 9] = [
        Channel::Instagram,
        Channel::Facebook,
        Channel::GoogleAds,
        Channel::Twitter,
        Channel::LinkedIn,
        Channel::TikTok,
        Channel::YouTube,
        Channel::Pinterest,
        Channel::Snapchat,
    ];

    /// Parse a channel identifier, ignoring case and surrounding whitespace
    ///
    /// Never fails: unrecognized identifiers become [`Channel::Unsupported`].
    pub fn parse(identifier: &str) -> Self {
        match identifier.trim().to_lowercase().as_str() {
            "instagram" => Self::Instagram,
            "facebook" => Self::Facebook,
            "google ads" => Self::GoogleAds,
            "twitter/x" | "twitter" => Self::Twitter,
            "linkedin" => Self::LinkedIn,
            "tiktok" => Self::TikTok,
            "youtube" => Self::YouTube,
            "pinterest" => Self::Pinterest,
            "snapchat" => Self::Snapchat,
            _ => Self::Unsupported,
        }
    }

    /// Provider family that publishes to this channel
    pub fn provider(&self) -> Option<Provider> {
        match self {
            Self::Instagram | Self::Facebook => Some(Provider::Meta),
            Self::GoogleAds => Some(Provider::GoogleAds),
            Self::Twitter => Some(Provider::Twitter),
            Self::LinkedIn => Some(Provider::LinkedIn),
            Self::TikTok => Some(Provider::TikTok),
            Self::YouTube => Some(Provider::YouTube),
            Self::Pinterest => Some(Provider::Pinterest),
            Self::Snapchat => Some(Provider::Snapchat),
            Self::Unsupported => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instagram => write!(f, "Instagram"),
            Self::Facebook => write!(f, "Facebook"),
            Self::GoogleAds => write!(f, "Google Ads"),
            Self::Twitter => write!(f, "Twitter/X"),
            Self::LinkedIn => write!(f, "LinkedIn"),
            Self::TikTok => write!(f, "TikTok"),
            Self::YouTube => write!(f, "YouTube"),
            Self::Pinterest => write!(f, "Pinterest"),
            Self::Snapchat => write!(f, "Snapchat"),
            Self::Unsupported => write!(f, "unsupported"),
        }
    }
}

impl std::str::FromStr for Channel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Provider family that owns the publishing API for one or more channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// Instagram and Facebook
    Meta,
    GoogleAds,
    Twitter,
    LinkedIn,
    TikTok,
    YouTube,
    Pinterest,
    Snapchat,
}

impl Provider {
    pub const ALL: [Provider; 8] = [
        Provider::Meta,
        Provider::GoogleAds,
        Provider::Twitter,
        Provider::LinkedIn,
        Provider::TikTok,
        Provider::YouTube,
        Provider::Pinterest,
        Provider::Snapchat,
    ];

    /// Configuration key under `[providers]`
    pub fn config_key(&self) -> &'static str {
        match self {
            Self::Meta => "meta",
            Self::GoogleAds => "google_ads",
            Self::Twitter => "twitter",
            Self::LinkedIn => "linkedin",
            Self::TikTok => "tiktok",
            Self::YouTube => "youtube",
            Self::Pinterest => "pinterest",
            Self::Snapchat => "snapchat",
        }
    }

    /// Google Ads cannot publish without a customer id alongside the token
    pub fn requires_account_id(&self) -> bool {
        matches!(self, Self::GoogleAds)
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.config_key())
    }
}
