//! Content creation stage
//!
//! Generates one content entry per requested channel plus one campaign
//! image. Per-channel calls run concurrently; entries are recorded in
//! channel order, and a channel whose generation fails is left out with an
//! error instead of blocking the others. The bare text of each entry is
//! also kept as that channel's draft for publication.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use maestro_agent::GenerationAdapter;
use maestro_core::{
    resolve_template, CampaignState, Drafts, Result, StageKind, StagePartial, StageUpdate,
};
use tracing::{debug, warn};

use crate::prompt;
use crate::stage::Stage;

/// Writes `contents` and `images` from `strategy`
pub struct ContentCreationStage {
    generator: GenerationAdapter,
    max_concurrency: usize,
}

impl ContentCreationStage {
    pub fn new(generator: GenerationAdapter, max_concurrency: usize) -> Self {
        Self {
            generator,
            max_concurrency: max_concurrency.max(1),
        }
    }

    async fn generate_for(&self, label: &str, strategy: &str) -> Result<String> {
        let template = resolve_template(label);
        let prompt = prompt::content_prompt(label, template, strategy);
        debug!("Generating {} content with template '{}'", label, template.heading);

        let text = self.generator.generate_text(&prompt).await?;
        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl Stage for ContentCreationStage {
    fn kind(&self) -> StageKind {
        StageKind::ContentCreation
    }

    async fn run(&self, state: &CampaignState) -> Result<StagePartial> {
        let Some(strategy) = state.strategy() else {
            return Ok(StagePartial::missing("strategy"));
        };
        if state.channels().is_empty() {
            return Ok(StagePartial::missing("channels"));
        }

        let calls: Vec<_> = state
            .channels()
            .iter()
            .map(|label| self.generate_for(label, strategy))
            .collect();
        let results: Vec<Result<String>> = stream::iter(calls)
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let mut contents = Vec::new();
        let mut drafts = Drafts::new();
        let mut errors = Vec::new();
        for (label, result) in state.channels().iter().zip(results) {
            match result {
                Ok(text) => {
                    contents.push(format!("**{}:**\n{}", label, text));
                    drafts.insert(label.clone(), text);
                }
                Err(e) => {
                    warn!("Content generation failed for {}: {}", label, e);
                    errors.push(format!("content generation failed for {}: {}", label, e));
                }
            }
        }

        if contents.is_empty() {
            return Ok(StagePartial {
                update: None,
                errors,
            });
        }

        let image = self.generator.generate_image(&prompt::image_prompt(state)).await;

        Ok(StagePartial {
            update: Some(StageUpdate::Content {
                contents,
                images: vec![image],
                drafts,
            }),
            errors,
        })
    }
}
