//! API key resolution for the generation service
//!
//! Resolved once at startup and handed to the client constructor.

use maestro_core::{GenerationConfig, MaestroError, Result};

/// Resolve the generation API key named by `config.api_key_env`
pub fn resolve_api_key(
    config: &GenerationConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String> {
    match lookup(&config.api_key_env) {
        Some(key) if !key.trim().is_empty() => {
            tracing::info!("Using API key from {}", config.api_key_env);
            Ok(key)
        }
        _ => Err(MaestroError::Auth(format!(
            "{} not found. Set it in the environment or run with --offline.",
            config.api_key_env
        ))),
    }
}
