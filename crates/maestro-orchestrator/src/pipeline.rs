//! Campaign pipeline orchestrator
//!
//! Runs the stages strictly in order over one [`CampaignState`]. Soft
//! errors never stop the run: a stage that could not do its job records
//! why, and later stages check their own inputs. Only a structural fault
//! (a stage returning `Err`, panicking, or writing a field it does not
//! own) aborts the run.

use chrono::{DateTime, Utc};
use futures::FutureExt;
use maestro_agent::GenerationAdapter;
use maestro_core::{
    CampaignBrief, CampaignState, MaestroError, PipelineConfig, Result, StageKind,
};
use maestro_publisher::ChannelDispatcher;
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::stage::Stage;
use crate::stages::{
    ContentCreationStage, FinalSummaryStage, OptimizationStage, PublicationStage, ResearchStage,
    StrategyStage,
};

/// How a stage ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Wrote its fields
    Completed,
    /// Wrote nothing, only errors
    Skipped,
}

/// Outcome of one stage in a run
#[derive(Debug, Clone, Serialize)]
pub struct StageRecord {
    pub stage: StageKind,
    pub status: StageStatus,
    pub errors_added: usize,
    pub elapsed_ms: u64,
}

/// Final state of a run plus per-stage records
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub state: CampaignState,
    pub stages: Vec<StageRecord>,
}

impl PipelineReport {
    pub fn stage(&self, kind: StageKind) -> Option<&StageRecord> {
        self.stages.iter().find(|r| r.stage == kind)
    }

    pub fn skipped(&self) -> Vec<StageKind> {
        self.stages
            .iter()
            .filter(|r| r.status == StageStatus::Skipped)
            .map(|r| r.stage)
            .collect()
    }
}

/// Ordered stage runner
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// The fixed campaign pipeline:
    /// research → strategy → content → publication → optimization → summary
    pub fn standard(
        generator: GenerationAdapter,
        dispatcher: ChannelDispatcher,
        config: &PipelineConfig,
    ) -> Self {
        Self::from_stages(vec![
            Box::new(ResearchStage::new(generator.clone())),
            Box::new(StrategyStage::new(generator.clone())),
            Box::new(ContentCreationStage::new(
                generator.clone(),
                config.max_concurrency,
            )),
            Box::new(PublicationStage::new(dispatcher)),
            Box::new(OptimizationStage::new(generator)),
            Box::new(FinalSummaryStage::new()),
        ])
    }

    /// Pipeline over an explicit stage list, run in the given order
    pub fn from_stages(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    pub fn stage_kinds(&self) -> Vec<StageKind> {
        self.stages.iter().map(|s| s.kind()).collect()
    }

    /// Validate the brief, run every stage and return the merged state
    pub async fn run(&self, brief: CampaignBrief) -> Result<CampaignState> {
        Ok(self.run_with_report(brief).await?.state)
    }

    /// Like [`Self::run`], with per-stage records
    pub async fn run_with_report(&self, brief: CampaignBrief) -> Result<PipelineReport> {
        brief.validate()?;
        self.run_state(CampaignState::from_brief(brief)).await
    }

    /// Run every stage over an existing state
    ///
    /// Errors already in `state` are kept in front of any new ones.
    pub async fn run_state(&self, mut state: CampaignState) -> Result<PipelineReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let mut records = Vec::with_capacity(self.stages.len());

        info!(
            run_id = %run_id,
            channels = state.channels().len(),
            "Starting campaign pipeline: {}",
            state.objective()
        );

        for stage in &self.stages {
            let kind = stage.kind();
            let started = Instant::now();
            info!(run_id = %run_id, stage = %kind, "Stage started");

            let partial = match AssertUnwindSafe(stage.run(&state)).catch_unwind().await {
                Ok(Ok(partial)) => partial,
                Ok(Err(e)) => return Err(structural(kind, e)),
                Err(payload) => {
                    return Err(MaestroError::StageFault {
                        stage: kind.to_string(),
                        message: format!("panicked: {}", panic_message(payload.as_ref())),
                    })
                }
            };

            for error in &partial.errors {
                warn!(run_id = %run_id, stage = %kind, "{}", error);
            }

            let status = if partial.is_update() {
                StageStatus::Completed
            } else {
                StageStatus::Skipped
            };
            let errors_added = partial.errors.len();
            state.apply(kind, partial)?;

            let elapsed_ms = started.elapsed().as_millis() as u64;
            info!(
                run_id = %run_id,
                stage = %kind,
                status = ?status,
                errors_added,
                elapsed_ms,
                "Stage finished"
            );

            records.push(StageRecord {
                stage: kind,
                status,
                errors_added,
                elapsed_ms,
            });
        }

        info!(
            run_id = %run_id,
            errors = state.errors().len(),
            "Campaign pipeline finished"
        );

        Ok(PipelineReport {
            run_id,
            started_at,
            state,
            stages: records,
        })
    }
}

/// Wrap a stage's `Err` as a structural fault
fn structural(kind: StageKind, error: MaestroError) -> MaestroError {
    if error.is_structural() {
        error
    } else {
        MaestroError::StageFault {
            stage: kind.to_string(),
            message: error.to_string(),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{adapter, brief, FakeGenerator};
    use async_trait::async_trait;
    use maestro_core::{StagePartial, StageUpdate};

    struct FaultyStage;

    #[async_trait]
    impl Stage for FaultyStage {
        fn kind(&self) -> StageKind {
            StageKind::Strategy
        }

        async fn run(&self, _state: &CampaignState) -> Result<StagePartial> {
            Err(MaestroError::Other("template table corrupted".to_string()))
        }
    }

    struct PanickingStage;

    #[async_trait]
    impl Stage for PanickingStage {
        fn kind(&self) -> StageKind {
            StageKind::Optimization
        }

        async fn run(&self, _state: &CampaignState) -> Result<StagePartial> {
            panic!("index out of bounds")
        }
    }

    /// Claims to be research but writes the summary
    struct TrespassingStage;

    #[async_trait]
    impl Stage for TrespassingStage {
        fn kind(&self) -> StageKind {
            StageKind::Research
        }

        async fn run(&self, _state: &CampaignState) -> Result<StagePartial> {
            Ok(StagePartial::update(StageUpdate::Summary("early".to_string())))
        }
    }

    fn standard(generator: FakeGenerator) -> Pipeline {
        Pipeline::standard(
            adapter(generator),
            ChannelDispatcher::simulated(),
            &PipelineConfig::default(),
        )
    }

    #[test]
    fn test_standard_order() {
        let pipeline = standard(FakeGenerator::default());
        assert_eq!(pipeline.stage_kinds(), StageKind::ORDER.to_vec());
    }

    #[tokio::test]
    async fn test_invalid_brief_is_rejected_before_stages() {
        let pipeline = standard(FakeGenerator::default());
        let result = pipeline.run(brief(&[])).await;
        assert!(matches!(result, Err(MaestroError::InvalidBrief(_))));
    }

    #[tokio::test]
    async fn test_full_run_completes_every_stage() {
        let pipeline = standard(FakeGenerator::default());
        let report = pipeline
            .run_with_report(brief(&["Instagram", "UnknownNet"]))
            .await
            .unwrap();

        assert_eq!(report.stages.len(), 6);
        assert!(report.skipped().is_empty());
        assert!(report.state.errors().is_empty());
        assert!(report.state.summary().is_some());
    }

    #[tokio::test]
    async fn test_soft_failure_does_not_halt() {
        let pipeline = standard(FakeGenerator {
            fail_text_when: Some("campaign strategist"),
            ..FakeGenerator::default()
        });
        let report = pipeline
            .run_with_report(brief(&["Instagram"]))
            .await
            .unwrap();

        assert_eq!(
            report.skipped(),
            vec![
                StageKind::Strategy,
                StageKind::ContentCreation,
                StageKind::Publication,
                StageKind::Optimization,
            ]
        );
        let state = &report.state;
        assert!(state.research().is_some());
        assert!(state.summary().is_some());
        assert_eq!(
            state.errors(),
            &[
                "strategy generation failed: API error: model overloaded",
                "strategy not found in state",
                "contents not found in state",
                "publications not found in state",
            ]
        );
        assert_eq!(report.stage(StageKind::Publication).unwrap().errors_added, 1);
    }

    #[tokio::test]
    async fn test_stage_error_is_structural_fault() {
        let pipeline = Pipeline::from_stages(vec![
            Box::new(ResearchStage::new(adapter(FakeGenerator::default()))),
            Box::new(FaultyStage),
            Box::new(FinalSummaryStage::new()),
        ]);
        match pipeline.run(brief(&["Instagram"])).await {
            Err(MaestroError::StageFault { stage, message }) => {
                assert_eq!(stage, "strategy");
                assert_eq!(message, "template table corrupted");
            }
            other => panic!("expected stage fault, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_panic_is_structural_fault() {
        let pipeline = Pipeline::from_stages(vec![Box::new(PanickingStage)]);
        match pipeline.run(brief(&["Instagram"])).await {
            Err(MaestroError::StageFault { stage, message }) => {
                assert_eq!(stage, "optimization");
                assert!(message.contains("index out of bounds"));
            }
            other => panic!("expected stage fault, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_foreign_write_is_ownership_violation() {
        let pipeline = Pipeline::from_stages(vec![Box::new(TrespassingStage)]);
        let result = pipeline.run(brief(&["Instagram"])).await;
        assert!(matches!(
            result,
            Err(MaestroError::OwnershipViolation { .. })
        ));
    }
}
