//! OpenAI-compatible generation client
//!
//! Each call is a single stateless request: no conversation history is
//! kept between stages. Rate limits and server errors are retried with
//! exponential backoff; hard failures feed the circuit breaker.

use crate::auth;
use crate::circuit_breaker::CircuitBreaker;
use crate::generator::Generator;
use crate::types::{ChatMessage, ChatRequest, ChatResponse, ImageRequest, ImageResponse};
use async_trait::async_trait;
use maestro_core::{GenerationConfig, MaestroError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

// Retry configuration
const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_SECS: u64 = 2;
const MAX_BACKOFF_SECS: u64 = 30;

/// Client for chat completions and image generation
#[derive(Debug)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    config: GenerationConfig,
    circuit_breaker: CircuitBreaker,
}

impl OpenAiClient {
    /// Create a client with an already-resolved API key
    pub fn new(config: GenerationConfig, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            config,
            circuit_breaker: CircuitBreaker::default(),
        }
    }

    /// Create a client, resolving the API key from the process environment
    pub fn from_env(config: GenerationConfig) -> Result<Self> {
        let key = auth::resolve_api_key(&config, |k| std::env::var(k).ok())?;
        Ok(Self::new(config, key))
    }

    pub fn with_circuit_breaker(mut self, circuit_breaker: CircuitBreaker) -> Self {
        self.circuit_breaker = circuit_breaker;
        self
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// POST a JSON body, retrying on 429 and 5xx
    async fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
        if !self.circuit_breaker.can_execute() {
            return Err(MaestroError::ApiLimit(format!(
                "Circuit breaker is OPEN - too many generation failures. Wait {} seconds before retry.",
                self.circuit_breaker.time_until_retry().as_secs()
            )));
        }

        let url = self.endpoint(path);
        let mut retries = 0;
        let mut backoff_secs = INITIAL_BACKOFF_SECS;

        loop {
            tracing::debug!("POST {} (attempt {})", url, retries + 1);

            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(body)
                .send()
                .await
                .map_err(|e| MaestroError::Api(format!("Failed to send request: {}", e)))?;

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                retries += 1;
                if retries > MAX_RETRIES {
                    self.circuit_breaker.record_failure();
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown".to_string());
                    return Err(MaestroError::ApiLimit(format!(
                        "{} after {} retries: {}",
                        status, MAX_RETRIES, error_text
                    )));
                }

                let wait_secs = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(backoff_secs);

                tracing::warn!(
                    "Generation API returned {}. Waiting {} seconds before retry {}/{}",
                    status,
                    wait_secs,
                    retries,
                    MAX_RETRIES
                );

                tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                backoff_secs = (backoff_secs * 2).min(MAX_BACKOFF_SECS);
                continue;
            }

            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown".to_string());

                self.circuit_breaker.record_failure();
                tracing::error!(
                    "Circuit breaker: recorded failure (count: {})",
                    self.circuit_breaker.failure_count()
                );

                return Err(MaestroError::Api(format!(
                    "Generation API error {}: {}",
                    status, error_text
                )));
            }

            let parsed = response
                .json::<R>()
                .await
                .map_err(|e| MaestroError::Api(format!("Failed to parse response: {}", e)))?;

            self.circuit_breaker.record_success();
            return Ok(parsed);
        }
    }
}

#[async_trait]
impl Generator for OpenAiClient {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response: ChatResponse = self.post("chat/completions", &request).await?;

        let output = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| MaestroError::Generation("No choices in response".to_string()))?;

        match response.usage {
            Some(usage) => tracing::info!(
                "Text generated with {} ({} chars, {} prompt tokens, {} completion tokens)",
                self.config.model,
                output.len(),
                usage.prompt_tokens,
                usage.completion_tokens
            ),
            None => tracing::info!(
                "Text generated with {} ({} chars)",
                self.config.model,
                output.len()
            ),
        }

        Ok(output)
    }

    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let request = ImageRequest {
            model: self.config.image_model.clone(),
            prompt: prompt.to_string(),
            size: self.config.image_size.clone(),
            quality: self.config.image_quality.clone(),
            n: 1,
        };

        let response: ImageResponse = self.post("images/generations", &request).await?;

        response
            .data
            .into_iter()
            .find_map(|d| d.url)
            .ok_or_else(|| MaestroError::Generation("No image URL in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_normalizes_trailing_slash() {
        let config = GenerationConfig {
            base_url: "http://localhost:8080/v1/".to_string(),
            ..GenerationConfig::default()
        };
        let client = OpenAiClient::new(config, "sk-test");
        assert_eq!(
            client.endpoint("chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_open_circuit_short_circuits() {
        let client = OpenAiClient::new(GenerationConfig::default(), "sk-test")
            .with_circuit_breaker(CircuitBreaker::new(1, 60));
        client.circuit_breaker.record_failure();

        let result = client.generate_text("hello").await;
        assert!(matches!(result, Err(MaestroError::ApiLimit(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_api_error() {
        let config = GenerationConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..GenerationConfig::default()
        };
        let client = OpenAiClient::new(config, "sk-test");
        assert!(matches!(
            client.generate_image("a poster").await,
            Err(MaestroError::Api(_))
        ));
    }
}
