//! Final summary stage
//!
//! Deterministic: no generation call, so a run always ends with a
//! readable account of what was and was not produced.

use async_trait::async_trait;
use maestro_core::{CampaignState, Result, StageKind, StagePartial, StageUpdate};

use crate::stage::Stage;

/// Writes `summary` from everything the run produced
#[derive(Debug, Default)]
pub struct FinalSummaryStage;

impl FinalSummaryStage {
    pub fn new() -> Self {
        Self
    }
}

fn first_line(text: &str) -> &str {
    text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("")
}

fn produced(value: Option<&str>) -> String {
    match value {
        Some(text) => format!("done - {}", first_line(text)),
        None => "missing".to_string(),
    }
}

/// Render the campaign summary report
pub fn render_summary(state: &CampaignState) -> String {
    let mut out = String::from("# Campaign summary\n\n");
    out.push_str(&format!("- Objective: {}\n", state.objective()));
    out.push_str(&format!("- Audience: {}\n", state.audience()));
    out.push_str(&format!("- Channels: {}\n", state.channels().join(", ")));
    out.push_str(&format!("- Budget: {:.2}\n\n", state.budget()));

    out.push_str(&format!("Research: {}\n", produced(state.research())));
    out.push_str(&format!("Strategy: {}\n", produced(state.strategy())));
    out.push_str(&format!(
        "Contents: {} generated\n",
        state.contents().len()
    ));
    out.push_str(&format!("Images: {}\n", state.images().len()));

    match state.publications() {
        Some(publications) => {
            out.push_str("Publications:\n");
            for (channel, status) in publications {
                out.push_str(&format!("- {}: {}\n", channel, status));
            }
        }
        None => out.push_str("Publications: missing\n"),
    }
    out.push_str(&format!("Optimization: {}\n", produced(state.optimization())));

    if state.errors().is_empty() {
        out.push_str("\nNo errors.\n");
    } else {
        out.push_str(&format!("\nErrors ({}):\n", state.errors().len()));
        for error in state.errors() {
            out.push_str(&format!("- {}\n", error));
        }
    }
    out
}

#[async_trait]
impl Stage for FinalSummaryStage {
    fn kind(&self) -> StageKind {
        StageKind::FinalSummary
    }

    async fn run(&self, state: &CampaignState) -> Result<StagePartial> {
        if state.objective().trim().is_empty() {
            return Ok(StagePartial::missing("objective"));
        }
        Ok(StagePartial::update(StageUpdate::Summary(render_summary(
            state,
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed, state};

    #[tokio::test]
    async fn test_summary_of_empty_run() {
        let s = state(&["Instagram", "UnknownNet"]);
        let partial = FinalSummaryStage::new().run(&s).await.unwrap();
        let Some(StageUpdate::Summary(summary)) = partial.update else {
            panic!("expected summary");
        };
        assert!(summary.contains("- Channels: Instagram, UnknownNet"));
        assert!(summary.contains("Research: missing"));
        assert!(summary.contains("Publications: missing"));
        assert!(summary.ends_with("No errors.\n"));
    }

    #[tokio::test]
    async fn test_summary_lists_outputs_and_errors() {
        let mut s = state(&["Instagram"])
            .with_errors(vec!["strategy generation failed: quota".to_string()]);
        seed(&mut s, StageUpdate::Research("\n  Trend: short video\nmore".to_string()));

        let summary = render_summary(&s);
        assert!(summary.contains("Research: done - Trend: short video\n"));
        assert!(summary.contains("Errors (1):\n- strategy generation failed: quota\n"));
    }
}
