//! Stage contract

use async_trait::async_trait;
use maestro_core::{CampaignState, Result, StageKind, StagePartial};

/// One step of the campaign pipeline
///
/// A stage reads the current state and returns a [`StagePartial`]. Missing
/// inputs and failed collaborator calls belong in `StagePartial::errors`;
/// returning `Err` is reserved for faults that must abort the whole run.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Which stage this is, and therefore which fields it may write
    fn kind(&self) -> StageKind;

    async fn run(&self, state: &CampaignState) -> Result<StagePartial>;
}
