//! Channel publication dispatcher
//!
//! Fans out one publication per requested channel and joins the outcomes
//! back in request order. Every outcome is a status string; nothing a
//! provider does can fail the dispatch as a whole.

use futures::stream::{self, StreamExt};
use maestro_core::{
    Channel, Drafts, MaestroError, PipelineConfig, Provider, ProviderCredentials, Publications,
    Result,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::publisher::{HttpPublisher, Publisher};
use crate::routing::{self, Route};

/// Failure reason for a real channel whose content generation failed
pub const NO_DRAFT_REASON: &str = "no content generated for this channel";

/// Maps channels to simulated or real publication
#[derive(Clone)]
pub struct ChannelDispatcher {
    credentials: ProviderCredentials,
    publishers: HashMap<Provider, Arc<dyn Publisher>>,
    timeout: Duration,
    max_concurrency: usize,
}

impl ChannelDispatcher {
    /// Build a dispatcher with an HTTP publisher for every configured provider
    pub fn new(credentials: ProviderCredentials, pipeline: &PipelineConfig) -> Result<Self> {
        let mut publishers: HashMap<Provider, Arc<dyn Publisher>> = HashMap::new();
        for provider in credentials.configured() {
            if let Some(config) = credentials.get(provider) {
                let publisher = HttpPublisher::from_config(provider, config)?;
                publishers.insert(provider, Arc::new(publisher));
            }
        }

        Ok(Self {
            credentials,
            publishers,
            timeout: Duration::from_secs(pipeline.call_timeout_secs),
            max_concurrency: pipeline.max_concurrency.max(1),
        })
    }

    /// Dispatcher with no credentials: every known channel is simulated
    pub fn simulated() -> Self {
        Self {
            credentials: ProviderCredentials::new(),
            publishers: HashMap::new(),
            timeout: Duration::from_secs(PipelineConfig::default().call_timeout_secs),
            max_concurrency: PipelineConfig::default().max_concurrency,
        }
    }

    /// Replace the publisher used for a provider
    ///
    /// Only consulted when the provider's credentials are present.
    pub fn with_publisher(mut self, provider: Provider, publisher: Arc<dyn Publisher>) -> Self {
        self.publishers.insert(provider, publisher);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max.max(1);
        self
    }

    pub fn credentials(&self) -> &ProviderCredentials {
        &self.credentials
    }

    /// Route a raw channel identifier
    pub fn route(&self, label: &str) -> Route {
        routing::route(Channel::parse(label), &self.credentials)
    }

    /// Produce the status for a single channel
    ///
    /// Simulated statuses preview `preview`. A real publication posts
    /// `draft`, the text generated for this channel; without one the
    /// channel records an error instead of posting another channel's text.
    pub async fn dispatch_one(&self, label: &str, preview: &str, draft: Option<&str>) -> String {
        match self.route(label) {
            Route::Unsupported => {
                info!("Channel {} is not supported", label);
                routing::unsupported_status(label)
            }
            Route::Simulated(channel) => {
                info!("Simulating publication to {}", label);
                routing::simulated_status(channel, label, preview)
            }
            Route::Real(_, provider) => {
                let Some(draft) = draft else {
                    warn!("No content generated for {}, skipping {}", label, provider);
                    return routing::failed_status(label, NO_DRAFT_REASON);
                };
                match self.publish_real(provider, label, draft).await {
                    Ok(confirmation) => {
                        info!("Published to {} via {}: {}", label, provider, confirmation);
                        routing::published_status(label, provider, &confirmation)
                    }
                    Err(e) => {
                        warn!("Publication to {} failed: {}", label, e);
                        routing::failed_status(label, &e.to_string())
                    }
                }
            }
        }
    }

    async fn publish_real(&self, provider: Provider, label: &str, content: &str) -> Result<String> {
        let publisher = self.publishers.get(&provider).ok_or_else(|| {
            MaestroError::Publication(format!("no publisher registered for {}", provider))
        })?;

        match tokio::time::timeout(self.timeout, publisher.publish(content, label)).await {
            Ok(result) => result,
            Err(_) => Err(MaestroError::Timeout(self.timeout)),
        }
    }

    /// Publish to every channel, one entry per channel
    ///
    /// Each channel posts its own entry from `drafts`. Calls run
    /// concurrently up to `max_concurrency`; the returned map follows the
    /// order of `channels`, not completion order.
    pub async fn dispatch(
        &self,
        channels: &[String],
        preview: &str,
        drafts: &Drafts,
    ) -> Publications {
        let calls: Vec<_> = channels
            .iter()
            .map(|label| {
                let draft = drafts.get(label).map(String::as_str);
                self.dispatch_one(label, preview, draft)
            })
            .collect();
        let statuses: Vec<String> = stream::iter(calls)
            .buffered(self.max_concurrency)
            .collect()
            .await;

        channels.iter().cloned().zip(statuses).collect()
    }
}

impl std::fmt::Debug for ChannelDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelDispatcher")
            .field("configured", &self.credentials.configured())
            .field("timeout", &self.timeout)
            .field("max_concurrency", &self.max_concurrency)
            .finish_non_exhaustive()
    }
}
