//! The six campaign stages, in pipeline order

mod content;
mod optimization;
mod publication;
mod research;
mod strategy;
mod summary;

pub use content::ContentCreationStage;
pub use optimization::OptimizationStage;
pub use publication::{PublicationStage, NO_CHANNEL_ERROR};
pub use research::ResearchStage;
pub use strategy::StrategyStage;
pub use summary::{render_summary, FinalSummaryStage};
