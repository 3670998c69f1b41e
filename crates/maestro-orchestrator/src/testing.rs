//! Fakes shared by stage and pipeline unit tests

use async_trait::async_trait;
use maestro_agent::{GenerationAdapter, Generator};
use maestro_core::{CampaignBrief, CampaignState, MaestroError, Result, StageKind, StageUpdate};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Generator answering with the first line of each prompt
#[derive(Default)]
pub struct FakeGenerator {
    /// Fail text generation for prompts containing this needle
    pub fail_text_when: Option<&'static str>,
    pub fail_image: bool,
    pub prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl Generator for FakeGenerator {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if let Some(needle) = self.fail_text_when {
            if prompt.contains(needle) {
                return Err(MaestroError::Api("model overloaded".to_string()));
            }
        }
        let first = prompt.lines().next().unwrap_or_default();
        Ok(format!("generated: {}", first))
    }

    async fn generate_image(&self, _prompt: &str) -> Result<String> {
        if self.fail_image {
            Err(MaestroError::Api("content policy violation".to_string()))
        } else {
            Ok("https://images.example/campaign.png".to_string())
        }
    }
}

pub fn adapter(generator: FakeGenerator) -> GenerationAdapter {
    GenerationAdapter::new(Arc::new(generator), Duration::from_secs(5))
}

pub fn brief(channels: &[&str]) -> CampaignBrief {
    CampaignBrief::new(
        "Increase bookings 20%",
        "adults 25-45",
        channels.iter().map(|c| c.to_string()).collect(),
        1000.0,
    )
}

pub fn state(channels: &[&str]) -> CampaignState {
    CampaignState::from_brief(brief(channels))
}

/// Apply an update directly, as an earlier stage would have
pub fn seed(state: &mut CampaignState, update: StageUpdate) {
    let kind: StageKind = update.kind();
    state
        .apply(kind, maestro_core::StagePartial::update(update))
        .unwrap();
}
