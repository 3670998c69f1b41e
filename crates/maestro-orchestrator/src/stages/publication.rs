//! Publication stage

use async_trait::async_trait;
use maestro_core::{CampaignState, Drafts, Result, StageKind, StagePartial, StageUpdate};
use maestro_publisher::ChannelDispatcher;

use crate::stage::Stage;

/// Error recorded when a run reaches publication with no channels
pub const NO_CHANNEL_ERROR: &str = "No channel specified for publication.";

/// Writes `publications`, one entry per requested channel
pub struct PublicationStage {
    dispatcher: ChannelDispatcher,
}

impl PublicationStage {
    pub fn new(dispatcher: ChannelDispatcher) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl Stage for PublicationStage {
    fn kind(&self) -> StageKind {
        StageKind::Publication
    }

    async fn run(&self, state: &CampaignState) -> Result<StagePartial> {
        let Some(preview) = state.contents().first() else {
            return Ok(StagePartial::missing("contents"));
        };
        if state.channels().is_empty() {
            return Ok(StagePartial::error(NO_CHANNEL_ERROR));
        }

        let empty = Drafts::new();
        let drafts = state.drafts().unwrap_or(&empty);
        let publications = self
            .dispatcher
            .dispatch(state.channels(), preview, drafts)
            .await;
        Ok(StagePartial::update(StageUpdate::Publication(publications)))
    }
}
