//! Market research stage

use async_trait::async_trait;
use maestro_agent::GenerationAdapter;
use maestro_core::{CampaignState, Result, StageKind, StagePartial, StageUpdate};

use crate::prompt;
use crate::stage::Stage;

/// Writes `research` from the campaign brief
pub struct ResearchStage {
    generator: GenerationAdapter,
}

impl ResearchStage {
    pub fn new(generator: GenerationAdapter) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Stage for ResearchStage {
    fn kind(&self) -> StageKind {
        StageKind::Research
    }

    async fn run(&self, state: &CampaignState) -> Result<StagePartial> {
        if state.objective().trim().is_empty() {
            return Ok(StagePartial::missing("objective"));
        }

        let prompt = prompt::research_prompt(state);
        tracing::debug!("Research prompt ({} chars)", prompt.len());
        match self.generator.generate_text(&prompt).await {
            Ok(research) => Ok(StagePartial::update(StageUpdate::Research(research))),
            Err(e) => Ok(StagePartial::error(format!("research generation failed: {}", e))),
        }
    }
}
