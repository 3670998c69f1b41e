//! Configuration management for Maestro
//!
//! This module provides the configuration object handed to the generation
//! adapter and the publication dispatcher at startup: model settings,
//! pipeline limits and per-provider credentials.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::channel::Provider;
use crate::Result;

/// Repository-level Maestro configuration
///
/// Loaded from `.maestro/config.toml` in the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaestroConfig {
    /// Deployment environment ("development", "production")
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Tracing filter for the CLI; see [`MaestroConfig::log_filter`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Text and image generation settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Pipeline execution limits
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Provider credentials, keyed by provider
    #[serde(default)]
    pub providers: ProviderCredentials,
}

/// Generation service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Chat model used for text generation
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_image_model")]
    pub image_model: String,

    #[serde(default = "default_image_size")]
    pub image_size: String,

    #[serde(default = "default_image_quality")]
    pub image_quality: String,

    /// Environment variable containing the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// OpenAI-compatible API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub max_tokens: Option<usize>,
}

/// Pipeline execution limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum concurrent per-channel collaborator calls
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Timeout for each external collaborator call
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
}

/// Credentials for one publishing provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Access/bearer token (developer token for Google Ads)
    #[serde(default)]
    pub access_token: Option<String>,

    /// Account, page or customer id
    #[serde(default)]
    pub account_id: Option<String>,

    /// Override for the provider publishing endpoint
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Credentials for all providers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderCredentials {
    providers: HashMap<String, ProviderConfig>,
}

/// Env vars read once at startup: (provider, token var, account id var)
const PROVIDER_ENV: [(Provider, &str, Option<&str>); 8] = [
    (Provider::Meta, "META_ACCESS_TOKEN", Some("META_APP_ID")),
    (
        Provider::GoogleAds,
        "GOOGLE_ADS_DEVELOPER_TOKEN",
        Some("GOOGLE_ADS_CUSTOMER_ID"),
    ),
    (Provider::Twitter, "TWITTER_BEARER_TOKEN", None),
    (Provider::LinkedIn, "LINKEDIN_ACCESS_TOKEN", Some("LINKEDIN_CLIENT_ID")),
    (Provider::TikTok, "TIKTOK_ACCESS_TOKEN", Some("TIKTOK_APP_ID")),
    (Provider::YouTube, "YOUTUBE_API_KEY", None),
    (Provider::Pinterest, "PINTEREST_ACCESS_TOKEN", None),
    (Provider::Snapchat, "SNAPCHAT_ACCESS_TOKEN", None),
];

fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl ProviderConfig {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

impl ProviderCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set credentials for a provider
    pub fn set(&mut self, provider: Provider, config: ProviderConfig) {
        self.providers.insert(provider.config_key().to_string(), config);
    }

    pub fn with(mut self, provider: Provider, config: ProviderConfig) -> Self {
        self.set(provider, config);
        self
    }

    pub fn get(&self, provider: Provider) -> Option<&ProviderConfig> {
        self.providers.get(provider.config_key())
    }

    /// Whether real publishing is possible for a provider
    ///
    /// A token is always required; Google Ads also needs a customer id.
    /// Whitespace-only values count as absent.
    pub fn is_configured(&self, provider: Provider) -> bool {
        match self.get(provider) {
            Some(config) => {
                non_empty(&config.access_token)
                    && (!provider.requires_account_id() || non_empty(&config.account_id))
            }
            None => false,
        }
    }

    /// Providers with usable credentials
    pub fn configured(&self) -> Vec<Provider> {
        Provider::ALL
            .into_iter()
            .filter(|p| self.is_configured(*p))
            .collect()
    }

    /// Fill credentials from the process environment
    ///
    /// Values already present in the config file win over env vars.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for (provider, token_var, account_var) in PROVIDER_ENV {
            let token = lookup(token_var);
            let account = account_var.and_then(&lookup);
            if token.is_none() && account.is_none() {
                continue;
            }
            let entry = self
                .providers
                .entry(provider.config_key().to_string())
                .or_default();
            if !non_empty(&entry.access_token) {
                entry.access_token = token;
            }
            if !non_empty(&entry.account_id) {
                entry.account_id = account;
            }
        }
    }
}

// Default value providers
fn default_environment() -> String {
    "development".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}

fn default_image_size() -> String {
    "1024x1024".to_string()
}

fn default_image_quality() -> String {
    "standard".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_max_concurrency() -> usize {
    4
}

fn default_call_timeout_secs() -> u64 {
    60
}

impl MaestroConfig {
    /// Load configuration from `.maestro/config.toml` or use defaults
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let config_path = root.join(".maestro/config.toml");

        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            crate::MaestroError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Write default configuration to `.maestro/config.toml`
    pub fn write_default(root: &Path) -> Result<std::path::PathBuf> {
        let config_dir = root.join(".maestro");
        std::fs::create_dir_all(&config_dir)?;

        let config_path = config_dir.join("config.toml");
        let content = toml::to_string_pretty(&Self::default()).map_err(|e| {
            crate::MaestroError::Config(format!("Failed to serialize config: {}", e))
        })?;
        std::fs::write(&config_path, content)?;
        Ok(config_path)
    }

    /// Apply overrides from environment variables
    ///
    /// Called once at startup, before logging is up, so rejected values
    /// are returned as messages for the caller to log.
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Vec<String> {
        let mut ignored = Vec::new();
        if let Some(env) = lookup("ENVIRONMENT") {
            self.environment = env.trim().to_lowercase();
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = Some(level.to_lowercase());
        }
        if let Some(model) = lookup("DEFAULT_LLM_MODEL") {
            self.generation.model = model;
        }
        if let Some(temperature) = lookup("DEFAULT_TEMPERATURE") {
            match temperature.parse::<f32>() {
                Ok(t) => self.generation.temperature = t,
                Err(_) => ignored.push(format!(
                    "Ignoring DEFAULT_TEMPERATURE={}: not a number",
                    temperature
                )),
            }
        }
        self.providers.apply_env(lookup);
        ignored
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Tracing filter to use when `RUST_LOG` is unset
    ///
    /// An explicit `log_level` wins; otherwise production runs log at
    /// `warn` and everything else at `info`.
    pub fn log_filter(&self) -> &str {
        match self.log_level.as_deref() {
            Some(level) if !level.trim().is_empty() => level,
            _ if self.is_production() => "warn",
            _ => "info",
        }
    }
}

impl Default for MaestroConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: None,
            generation: GenerationConfig::default(),
            pipeline: PipelineConfig::default(),
            providers: ProviderCredentials::default(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            image_model: default_image_model(),
            image_size: default_image_size(),
            image_quality: default_image_quality(),
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            max_tokens: None,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            call_timeout_secs: default_call_timeout_secs(),
        }
    }
}
