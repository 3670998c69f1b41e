//! Core type definitions for Maestro campaign runs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{MaestroError, Result};

/// Per-channel publication outcomes, iterated in channel request order
pub type Publications = IndexMap<String, String>;

/// Generated text per channel label, without the display header
pub type Drafts = IndexMap<String, String>;

/// Campaign brief supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignBrief {
    pub objective: String,
    pub audience: String,
    pub channels: Vec<String>,
    pub budget: f64,
}

impl CampaignBrief {
    pub fn new(
        objective: impl Into<String>,
        audience: impl Into<String>,
        channels: Vec<String>,
        budget: f64,
    ) -> Self {
        Self {
            objective: objective.into(),
            audience: audience.into(),
            channels,
            budget,
        }
    }

    /// Check the entry contract of a pipeline run
    pub fn validate(&self) -> Result<()> {
        if self.objective.trim().is_empty() {
            return Err(MaestroError::InvalidBrief("objective is empty".to_string()));
        }
        if self.audience.trim().is_empty() {
            return Err(MaestroError::InvalidBrief("audience is empty".to_string()));
        }
        if self.channels.is_empty() {
            return Err(MaestroError::InvalidBrief(
                "at least one channel is required".to_string(),
            ));
        }
        if !self.budget.is_finite() || self.budget < 0.0 {
            return Err(MaestroError::InvalidBrief(format!(
                "budget must be a non-negative number, got {}",
                self.budget
            )));
        }
        Ok(())
    }
}

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Research,
    Strategy,
    ContentCreation,
    Publication,
    Optimization,
    FinalSummary,
}

impl StageKind {
    pub const ORDER: [StageKind; 6] = [
        StageKind::Research,
        StageKind::Strategy,
        StageKind::ContentCreation,
        StageKind::Publication,
        StageKind::Optimization,
        StageKind::FinalSummary,
    ];

    /// State fields this stage is allowed to write
    pub fn owned_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Research => &["research"],
            Self::Strategy => &["strategy"],
            Self::ContentCreation => &["contents", "images", "drafts"],
            Self::Publication => &["publications"],
            Self::Optimization => &["optimization"],
            Self::FinalSummary => &["summary"],
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Research => write!(f, "research"),
            Self::Strategy => write!(f, "strategy"),
            Self::ContentCreation => write!(f, "content_creation"),
            Self::Publication => write!(f, "publication"),
            Self::Optimization => write!(f, "optimization"),
            Self::FinalSummary => write!(f, "final_summary"),
        }
    }
}

/// Fields written by exactly one stage
#[derive(Debug, Clone, PartialEq)]
pub enum StageUpdate {
    Research(String),
    Strategy(String),
    /// `contents` are the display entries; `drafts` holds the same text
    /// keyed by channel, as posted to that channel
    Content {
        contents: Vec<String>,
        images: Vec<String>,
        drafts: Drafts,
    },
    Publication(Publications),
    Optimization(String),
    Summary(String),
}

impl StageUpdate {
    /// Stage that owns the fields in this update
    pub fn kind(&self) -> StageKind {
        match self {
            Self::Research(_) => StageKind::Research,
            Self::Strategy(_) => StageKind::Strategy,
            Self::Content { .. } => StageKind::ContentCreation,
            Self::Publication(_) => StageKind::Publication,
            Self::Optimization(_) => StageKind::Optimization,
            Self::Summary(_) => StageKind::FinalSummary,
        }
    }
}

/// Output of one stage: an optional update plus soft errors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StagePartial {
    pub update: Option<StageUpdate>,
    pub errors: Vec<String>,
}

impl StagePartial {
    /// A successful stage with no soft errors
    pub fn update(update: StageUpdate) -> Self {
        Self {
            update: Some(update),
            errors: Vec::new(),
        }
    }

    /// A stage that could not do its job
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            update: None,
            errors: vec![message.into()],
        }
    }

    /// Shorthand for a missing-precondition error
    pub fn missing(field: &str) -> Self {
        Self::error(MaestroError::MissingInput(field.to_string()).to_string())
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.errors.push(message.into());
        self
    }

    pub fn is_update(&self) -> bool {
        self.update.is_some()
    }
}

/// The single record threaded through every stage of a run
///
/// Brief fields are private and only readable, so no stage can rewrite
/// them. Every other field is written through [`CampaignState::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignState {
    objective: String,
    audience: String,
    channels: Vec<String>,
    budget: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    research: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    contents: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    drafts: Option<Drafts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    publications: Option<Publications>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    optimization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    summary: Option<String>,

    #[serde(default)]
    errors: Vec<String>,
}

impl CampaignState {
    /// Create the initial state for a run
    pub fn from_brief(brief: CampaignBrief) -> Self {
        Self {
            objective: brief.objective,
            audience: brief.audience,
            channels: brief.channels,
            budget: brief.budget,
            research: None,
            strategy: None,
            contents: None,
            images: None,
            drafts: None,
            publications: None,
            optimization: None,
            summary: None,
            errors: Vec::new(),
        }
    }

    /// Seed errors recorded before this run (e.g. by an earlier partial run)
    pub fn with_errors(mut self, errors: impl IntoIterator<Item = String>) -> Self {
        self.errors.extend(errors);
        self
    }

    /// Merge a stage's partial output into the state
    ///
    /// Errors are appended in order. An update whose fields belong to a
    /// different stage is rejected before anything is written.
    pub fn apply(&mut self, stage: StageKind, partial: StagePartial) -> Result<()> {
        if let Some(update) = &partial.update {
            let owner = update.kind();
            if owner != stage {
                return Err(MaestroError::OwnershipViolation {
                    stage: stage.to_string(),
                    field: owner.owned_fields().join(", "),
                });
            }
        }

        self.errors.extend(partial.errors);

        match partial.update {
            Some(StageUpdate::Research(text)) => self.research = Some(text),
            Some(StageUpdate::Strategy(text)) => self.strategy = Some(text),
            Some(StageUpdate::Content {
                contents,
                images,
                drafts,
            }) => {
                self.contents = Some(contents);
                self.images = Some(images);
                self.drafts = Some(drafts);
            }
            Some(StageUpdate::Publication(publications)) => {
                self.publications = Some(publications)
            }
            Some(StageUpdate::Optimization(text)) => self.optimization = Some(text),
            Some(StageUpdate::Summary(text)) => self.summary = Some(text),
            None => {}
        }
        Ok(())
    }

    pub fn objective(&self) -> &str {
        &self.objective
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn research(&self) -> Option<&str> {
        self.research.as_deref()
    }

    pub fn strategy(&self) -> Option<&str> {
        self.strategy.as_deref()
    }

    /// Generated content, empty until Content-Creation succeeds
    pub fn contents(&self) -> &[String] {
        self.contents.as_deref().unwrap_or_default()
    }

    pub fn has_contents(&self) -> bool {
        self.contents.is_some()
    }

    pub fn images(&self) -> &[String] {
        self.images.as_deref().unwrap_or_default()
    }

    pub fn has_images(&self) -> bool {
        self.images.is_some()
    }

    /// Text generated for `channel`, if its generation succeeded
    pub fn draft(&self, channel: &str) -> Option<&str> {
        self.drafts.as_ref()?.get(channel).map(String::as_str)
    }

    pub fn drafts(&self) -> Option<&Drafts> {
        self.drafts.as_ref()
    }

    pub fn publications(&self) -> Option<&Publications> {
        self.publications.as_ref()
    }

    pub fn optimization(&self) -> Option<&str> {
        self.optimization.as_deref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}
