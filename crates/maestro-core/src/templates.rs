//! Channel content templates
//!
//! Fixed table of per-channel format constraints used to shape content
//! prompts. Resolution is pure: no I/O, no state.

use crate::channel::Channel;

/// One expected section of a piece of channel content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSection {
    pub label: &'static str,
    pub guidance: &'static str,
}

/// Format constraints for content on a single channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentTemplate {
    /// Channel whose table entry this is
    pub channel: Channel,
    /// Heading, e.g. "Instagram post"
    pub heading: &'static str,
    /// Hard character limit on the main text, if the platform has one
    pub char_limit: Option<usize>,
    pub sections: &'static [TemplateSection],
}

const fn section(label: &'static str, guidance: &'static str) -> TemplateSection {
    TemplateSection { label, guidance }
}

const INSTAGRAM: ContentTemplate = ContentTemplate {
    channel: Channel::Instagram,
    heading: "Instagram post",
    char_limit: Some(2200),
    sections: &[
        section("Text (up to 2200 characters)", "Engaging, visual copy"),
        section("Hashtags", "#example #content"),
        section("Call to Action", "\"Liked it? Save and share!\""),
        section("Image", "Detailed description for image generation"),
    ],
};

const FACEBOOK: ContentTemplate = ContentTemplate {
    channel: Channel::Facebook,
    heading: "Facebook post",
    char_limit: Some(63206),
    sections: &[
        section("Text (up to 63206 characters)", "Informative, conversational copy"),
        section("Hashtags", "#example #content"),
        section("Call to Action", "\"Tell us what you think!\""),
        section("Image", "Description for image generation"),
    ],
};

const TWITTER: ContentTemplate = ContentTemplate {
    channel: Channel::Twitter,
    heading: "Tweet for Twitter/X",
    char_limit: Some(280),
    sections: &[
        section("Text (up to 280 characters)", "Concise, punchy copy"),
        section("Hashtags", "#example"),
        section("Mention", "@relevant_account"),
        section("Image", "Optional description"),
    ],
};

const LINKEDIN: ContentTemplate = ContentTemplate {
    channel: Channel::LinkedIn,
    heading: "LinkedIn post",
    char_limit: Some(3000),
    sections: &[
        section("Professional text", "B2B content with valuable insights"),
        section("Hashtags", "#business #marketing"),
        section("Call to Action", "\"What do you think? Share in the comments!\""),
        section("Image", "Professional chart or infographic"),
    ],
};

const TIKTOK: ContentTemplate = ContentTemplate {
    channel: Channel::TikTok,
    heading: "TikTok video",
    char_limit: Some(2200),
    sections: &[
        section("Duration", "15-60 seconds"),
        section("Script", "Video beats, voice-over, music"),
        section("Hashtags", "#viral #content"),
        section("Thumbnail", "Eye-catching description"),
    ],
};

const YOUTUBE: ContentTemplate = ContentTemplate {
    channel: Channel::YouTube,
    heading: "YouTube video",
    char_limit: Some(5000),
    sections: &[
        section("Title", "SEO-optimized title"),
        section("Description", "Keyword-rich description with links"),
        section("Thumbnail", "Striking description"),
        section("Tags", "keyword1, keyword2"),
    ],
};

const PINTEREST: ContentTemplate = ContentTemplate {
    channel: Channel::Pinterest,
    heading: "Pinterest pin",
    char_limit: Some(500),
    sections: &[
        section("Title", "Descriptive title"),
        section("Description", "Search-optimized text"),
        section("Link", "Destination URL"),
        section("Image", "Attractive vertical image"),
    ],
};

const SNAPCHAT: ContentTemplate = ContentTemplate {
    channel: Channel::Snapchat,
    heading: "Snapchat story",
    char_limit: Some(250),
    sections: &[
        section("Content", "Short text, emoji, sticker"),
        section("Duration", "24 hours"),
        section("Filter/Geofilter", "Suggestion"),
    ],
};

const GOOGLE_ADS: ContentTemplate = ContentTemplate {
    channel: Channel::GoogleAds,
    heading: "Google Ads ad",
    char_limit: Some(90),
    sections: &[
        section("Title", "Attractive headline, up to 30 characters"),
        section("Description", "Persuasive description, up to 90 characters"),
        section("URL", "Landing page"),
        section("Keywords", "List of keywords"),
    ],
};

/// Template used for any channel outside the table
pub const DEFAULT_TEMPLATE: &ContentTemplate = &INSTAGRAM;

impl ContentTemplate {
    /// Template for an already-parsed channel
    pub fn for_channel(channel: Channel) -> &'static ContentTemplate {
        match channel {
            Channel::Instagram => &INSTAGRAM,
            Channel::Facebook => &FACEBOOK,
            Channel::GoogleAds => &GOOGLE_ADS,
            Channel::Twitter => &TWITTER,
            Channel::LinkedIn => &LINKEDIN,
            Channel::TikTok => &TIKTOK,
            Channel::YouTube => &YOUTUBE,
            Channel::Pinterest => &PINTEREST,
            Channel::Snapchat => &SNAPCHAT,
            Channel::Unsupported => DEFAULT_TEMPLATE,
        }
    }

    /// Render the template block embedded in a content prompt
    pub fn render(&self) -> String {
        let mut out = format!("**{}:**\n", self.heading);
        for section in self.sections {
            out.push_str(&format!("- **{}:** [{}]\n", section.label, section.guidance));
        }
        out
    }
}

/// Resolve the template for a raw channel identifier
///
/// Unknown identifiers fall back to [`DEFAULT_TEMPLATE`] so that no
/// channel blocks content generation.
pub fn resolve_template(identifier: &str) -> &'static ContentTemplate {
    ContentTemplate::for_channel(Channel::parse(identifier))
}
