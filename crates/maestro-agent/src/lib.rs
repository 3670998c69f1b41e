//! # maestro-agent
//!
//! Generation collaborator for Maestro campaign stages.
//!
//! - [`Generator`] is the boundary to a text/image generation service
//! - [`GenerationAdapter`] bounds every call by a timeout and turns image
//!   failures into inline placeholders
//! - [`OpenAiClient`] talks to any OpenAI-compatible API, with retries and
//!   a per-instance circuit breaker
//! - [`OfflineGenerator`] drafts deterministic text without a network

mod auth;
mod circuit_breaker;
mod client;
mod generator;
mod offline;
mod types;

pub use auth::resolve_api_key;
pub use circuit_breaker::{CircuitBreaker, CircuitState};
pub use client::OpenAiClient;
pub use generator::{with_timeout, GenerationAdapter, Generator, IMAGE_ERROR_PREFIX};
pub use offline::OfflineGenerator;
pub use types::*;
