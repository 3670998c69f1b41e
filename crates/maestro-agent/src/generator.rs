//! Generation collaborator boundary
//!
//! Stages never talk to a generation service directly. They go through
//! [`GenerationAdapter`], which applies the per-call timeout and turns
//! image failures into inline placeholders.

use async_trait::async_trait;
use maestro_core::{MaestroError, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Prefix of the placeholder recorded when image generation fails
pub const IMAGE_ERROR_PREFIX: &str = "error generating image";

/// External text/image generation service
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate text for a prompt
    async fn generate_text(&self, prompt: &str) -> Result<String>;

    /// Generate an image and return its URL or reference
    async fn generate_image(&self, prompt: &str) -> Result<String>;
}

/// Timeout-bounded front for a [`Generator`]
#[derive(Clone)]
pub struct GenerationAdapter {
    generator: Arc<dyn Generator>,
    timeout: Duration,
}

impl GenerationAdapter {
    pub fn new(generator: Arc<dyn Generator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Generate text; failures and timeouts propagate to the caller
    pub async fn generate_text(&self, prompt: &str) -> Result<String> {
        with_timeout(self.timeout, self.generator.generate_text(prompt)).await
    }

    /// Generate an image; never fails
    ///
    /// Any failure becomes `"error generating image: <reason>"`.
    pub async fn generate_image(&self, prompt: &str) -> String {
        match with_timeout(self.timeout, self.generator.generate_image(prompt)).await {
            Ok(reference) => reference,
            Err(e) => {
                tracing::warn!("Image generation failed, recording placeholder: {}", e);
                format!("{}: {}", IMAGE_ERROR_PREFIX, e)
            }
        }
    }
}

impl std::fmt::Debug for GenerationAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationAdapter")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Bound a collaborator call by `timeout`
pub async fn with_timeout<T>(
    timeout: Duration,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(MaestroError::Timeout(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted {
        text: Result<String>,
        image: Result<String>,
        delay: Duration,
    }

    fn clone_result(r: &Result<String>) -> Result<String> {
        match r {
            Ok(s) => Ok(s.clone()),
            Err(e) => Err(MaestroError::Generation(e.to_string())),
        }
    }

    #[async_trait]
    impl Generator for Scripted {
        async fn generate_text(&self, _prompt: &str) -> Result<String> {
            tokio::time::sleep(self.delay).await;
            clone_result(&self.text)
        }

        async fn generate_image(&self, _prompt: &str) -> Result<String> {
            tokio::time::sleep(self.delay).await;
            clone_result(&self.image)
        }
    }

    fn adapter(text: Result<String>, image: Result<String>, delay_ms: u64) -> GenerationAdapter {
        GenerationAdapter::new(
            Arc::new(Scripted {
                text,
                image,
                delay: Duration::from_millis(delay_ms),
            }),
            Duration::from_millis(100),
        )
    }

    #[tokio::test]
    async fn test_text_passes_through() {
        let a = adapter(Ok("copy".to_string()), Ok("url".to_string()), 0);
        assert_eq!(a.generate_text("p").await.unwrap(), "copy");
        assert_eq!(a.generate_image("p").await, "url");
    }

    #[tokio::test]
    async fn test_text_failure_propagates() {
        let a = adapter(
            Err(MaestroError::Api("quota".to_string())),
            Ok("url".to_string()),
            0,
        );
        assert!(a.generate_text("p").await.is_err());
    }

    #[tokio::test]
    async fn test_image_failure_becomes_placeholder() {
        let a = adapter(
            Ok("copy".to_string()),
            Err(MaestroError::Api("content policy".to_string())),
            0,
        );
        let image = a.generate_image("p").await;
        assert!(image.starts_with("error generating image: "));
        assert!(image.contains("content policy"));
    }

    #[tokio::test]
    async fn test_timeouts() {
        let a = adapter(Ok("late".to_string()), Ok("late".to_string()), 500);
        match a.generate_text("p").await {
            Err(e @ MaestroError::Timeout(_)) => {
                assert_eq!(e.to_string(), "Timed out after 100ms");
            }
            other => panic!("expected timeout, got {:?}", other),
        }
        assert!(a.generate_image("p").await.starts_with(IMAGE_ERROR_PREFIX));
    }
}
