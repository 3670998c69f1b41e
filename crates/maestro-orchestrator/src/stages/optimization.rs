//! Optimization stage

use async_trait::async_trait;
use maestro_agent::GenerationAdapter;
use maestro_core::{CampaignState, Result, StageKind, StagePartial, StageUpdate};

use crate::prompt;
use crate::stage::Stage;

/// Writes `optimization` from publication outcomes
pub struct OptimizationStage {
    generator: GenerationAdapter,
}

impl OptimizationStage {
    pub fn new(generator: GenerationAdapter) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Stage for OptimizationStage {
    fn kind(&self) -> StageKind {
        StageKind::Optimization
    }

    async fn run(&self, state: &CampaignState) -> Result<StagePartial> {
        let Some(publications) = state.publications() else {
            return Ok(StagePartial::missing("publications"));
        };

        let prompt = prompt::optimization_prompt(state, publications);
        tracing::debug!("Optimizing over {} publication statuses", publications.len());
        match self.generator.generate_text(&prompt).await {
            Ok(notes) => Ok(StagePartial::update(StageUpdate::Optimization(notes))),
            Err(e) => Ok(StagePartial::error(format!(
                "optimization generation failed: {}",
                e
            ))),
        }
    }
}
