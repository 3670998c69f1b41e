//! # maestro-orchestrator
//!
//! Campaign pipeline engine for Maestro.
//!
//! This crate provides:
//! - The [`Stage`] contract and the six campaign stages
//! - Prompt builders for the generation-backed stages
//! - The [`Pipeline`] orchestrator with its soft-fail merge policy

mod pipeline;
pub mod prompt;
mod stage;
pub mod stages;
#[cfg(test)]
mod testing;

pub use pipeline::{Pipeline, PipelineReport, StageRecord, StageStatus};
pub use stage::Stage;
pub use stages::{
    render_summary, ContentCreationStage, FinalSummaryStage, OptimizationStage, PublicationStage,
    ResearchStage, StrategyStage, NO_CHANNEL_ERROR,
};
