//! Campaign strategy stage

use async_trait::async_trait;
use maestro_agent::GenerationAdapter;
use maestro_core::{CampaignState, Result, StageKind, StagePartial, StageUpdate};

use crate::prompt;
use crate::stage::Stage;

/// Writes `strategy` from `research`
pub struct StrategyStage {
    generator: GenerationAdapter,
}

impl StrategyStage {
    pub fn new(generator: GenerationAdapter) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Stage for StrategyStage {
    fn kind(&self) -> StageKind {
        StageKind::Strategy
    }

    async fn run(&self, state: &CampaignState) -> Result<StagePartial> {
        let Some(research) = state.research() else {
            return Ok(StagePartial::missing("research"));
        };

        let prompt = prompt::strategy_prompt(state, research);
        match self.generator.generate_text(&prompt).await {
            Ok(strategy) => Ok(StagePartial::update(StageUpdate::Strategy(strategy))),
            Err(e) => Ok(StagePartial::error(format!("strategy generation failed: {}", e))),
        }
    }
}
