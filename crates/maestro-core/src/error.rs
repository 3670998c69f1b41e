//! Unified error types for Maestro

use std::time::Duration;
use thiserror::Error;

/// Unified error type for all Maestro operations
///
/// Only a handful of these ever leave the pipeline. Soft failures
/// (missing inputs, generation and publication errors) are recorded as
/// strings in [`crate::CampaignState::errors`] by the stage that hit them.
#[derive(Error, Debug)]
pub enum MaestroError {
    // Brief errors
    #[error("Invalid campaign brief: {0}")]
    InvalidBrief(String),

    #[error("{0} not found in state")]
    MissingInput(String),

    // Collaborator errors
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Publication error: {0}")]
    Publication(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("API limit reached: {0}")]
    ApiLimit(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Structural faults
    #[error("Stage '{stage}' faulted: {message}")]
    StageFault { stage: String, message: String },

    #[error("Stage '{stage}' attempted to write '{field}', which it does not own")]
    OwnershipViolation { stage: String, field: String },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

impl MaestroError {
    /// Whether this error aborts a pipeline run
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::StageFault { .. } | Self::OwnershipViolation { .. } | Self::InvalidBrief(_)
        )
    }
}

/// Result type alias using MaestroError
pub type Result<T> = std::result::Result<T, MaestroError>;
