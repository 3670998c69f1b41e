//! Provider publishing collaborators

use async_trait::async_trait;
use maestro_core::{MaestroError, Provider, ProviderConfig, Result};

/// External publishing API for one provider family
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish `content` to `channel`, returning the provider confirmation
    async fn publish(&self, content: &str, channel: &str) -> Result<String>;
}

/// Default publishing endpoint per provider
pub fn default_endpoint(provider: Provider) -> &'static str {
    match provider {
        Provider::Meta => "https://graph.facebook.com/v19.0/me/feed",
        Provider::GoogleAds => "https://googleads.googleapis.com/v16/customers",
        Provider::Twitter => "https://api.twitter.com/2/tweets",
        Provider::LinkedIn => "https://api.linkedin.com/v2/ugcPosts",
        Provider::TikTok => "https://open.tiktokapis.com/v2/post/publish/content/init/",
        Provider::YouTube => "https://www.googleapis.com/youtube/v3/videos",
        Provider::Pinterest => "https://api.pinterest.com/v5/pins",
        Provider::Snapchat => "https://adsapi.snapchat.com/v1/adaccounts",
    }
}

/// Publisher that POSTs a JSON message to a provider endpoint
///
/// Body: `{"channel", "message", "account_id"}` with a bearer token.
/// The confirmation is the `id` field of a JSON response, or the raw
/// response body otherwise.
#[derive(Debug, Clone)]
pub struct HttpPublisher {
    provider: Provider,
    endpoint: String,
    token: String,
    account_id: Option<String>,
    http: reqwest::Client,
}

impl HttpPublisher {
    /// Build a publisher from provider credentials
    pub fn from_config(provider: Provider, config: &ProviderConfig) -> Result<Self> {
        let token = config
            .access_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                MaestroError::Config(format!("{} publisher requires an access_token", provider))
            })?;

        Ok(Self {
            provider,
            endpoint: config
                .endpoint
                .clone()
                .unwrap_or_else(|| default_endpoint(provider).to_string()),
            token,
            account_id: config.account_id.clone(),
            http: reqwest::Client::new(),
        })
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Extract a confirmation from a provider response body
fn confirmation(body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    match parsed.as_ref().and_then(|v| v.get("id")) {
        Some(serde_json::Value::String(id)) => id.clone(),
        Some(serde_json::Value::Number(id)) => id.to_string(),
        _ if body.trim().is_empty() => "ok".to_string(),
        _ => body.trim().to_string(),
    }
}

#[async_trait]
impl Publisher for HttpPublisher {
    async fn publish(&self, content: &str, channel: &str) -> Result<String> {
        tracing::debug!("Publishing to {} via {}", channel, self.endpoint);

        let body = serde_json::json!({
            "channel": channel,
            "message": content,
            "account_id": self.account_id,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| MaestroError::Publication(format!("request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| MaestroError::Publication(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(MaestroError::Publication(format!(
                "{} returned {}: {}",
                self.provider,
                status,
                text.trim()
            )));
        }

        Ok(confirmation(&text))
    }
}
