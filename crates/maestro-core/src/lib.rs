//! # maestro-core
//!
//! Core types for the Maestro campaign orchestration system.
//!
//! A campaign run threads one [`CampaignState`] through a fixed sequence of
//! stages. Each stage returns a [`StagePartial`]: at most one update to the
//! fields it owns, plus any soft errors. Soft errors are data; only
//! structural faults surface as [`MaestroError`].

pub mod channel;
pub mod config;
mod error;
pub mod templates;
mod types;

pub use channel::{Channel, Provider};
pub use config::{
    GenerationConfig, MaestroConfig, PipelineConfig, ProviderConfig, ProviderCredentials,
};
pub use error::{MaestroError, Result};
pub use templates::{resolve_template, ContentTemplate, TemplateSection, DEFAULT_TEMPLATE};
pub use types::*;
