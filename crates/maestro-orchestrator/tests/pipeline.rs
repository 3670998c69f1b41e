//! End-to-end campaign pipeline runs against fake collaborators

use async_trait::async_trait;
use maestro_agent::{GenerationAdapter, Generator};
use maestro_core::{
    CampaignBrief, CampaignState, MaestroError, PipelineConfig, Provider, ProviderConfig,
    ProviderCredentials, Result, StageKind, StagePartial, StageUpdate,
};
use maestro_orchestrator::{Pipeline, PublicationStage, StageStatus, NO_CHANNEL_ERROR};
use maestro_publisher::{ChannelDispatcher, Publisher};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Echoes the first prompt line, optionally failing on a needle
struct EchoGenerator {
    fail_when: Option<&'static str>,
}

#[async_trait]
impl Generator for EchoGenerator {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        if let Some(needle) = self.fail_when {
            if prompt.contains(needle) {
                return Err(MaestroError::Api("rate limited".to_string()));
            }
        }
        Ok(format!("echo: {}", prompt.lines().next().unwrap_or_default()))
    }

    async fn generate_image(&self, _prompt: &str) -> Result<String> {
        Ok("https://cdn.example/hero.png".to_string())
    }
}

/// Provider stand-in that keeps every (channel, text) it was given
#[derive(Default)]
struct RecordingPublisher {
    posts: Mutex<Vec<(String, String)>>,
}

impl RecordingPublisher {
    fn posts(&self) -> Vec<(String, String)> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, content: &str, channel: &str) -> Result<String> {
        self.posts
            .lock()
            .unwrap()
            .push((channel.to_string(), content.to_string()));
        Ok(format!("{}-post", channel.to_lowercase()))
    }
}

/// Meta API stand-in that rejects every post
struct RejectingPublisher;

#[async_trait]
impl Publisher for RejectingPublisher {
    async fn publish(&self, _content: &str, _channel: &str) -> Result<String> {
        Err(MaestroError::Publication("403 Forbidden".to_string()))
    }
}

fn generator(fail_when: Option<&'static str>) -> GenerationAdapter {
    GenerationAdapter::new(Arc::new(EchoGenerator { fail_when }), Duration::from_secs(5))
}

fn pipeline(fail_when: Option<&'static str>, dispatcher: ChannelDispatcher) -> Pipeline {
    Pipeline::standard(generator(fail_when), dispatcher, &PipelineConfig::default())
}

fn brief(channels: &[&str]) -> CampaignBrief {
    CampaignBrief::new(
        "Increase bookings 20%",
        "adults 25-45",
        channels.iter().map(|c| c.to_string()).collect(),
        1000.0,
    )
}

#[tokio::test]
async fn test_simulated_and_unknown_channels() {
    let state = pipeline(None, ChannelDispatcher::simulated())
        .run(brief(&["Instagram", "UnknownNet"]))
        .await
        .unwrap();

    assert_eq!(state.contents().len(), 2);
    assert_eq!(state.images().len(), 1);

    let first = &state.contents()[0];
    assert!(first.starts_with("**Instagram:**\n"));

    let publications = state.publications().unwrap();
    let keys: Vec<&str> = publications.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Instagram", "UnknownNet"]);
    assert_eq!(
        publications["Instagram"],
        format!("Published to Instagram successfully (simulated): {}...", first)
    );
    assert_eq!(
        publications["UnknownNet"],
        "Publication to UnknownNet not supported yet."
    );

    assert!(state.optimization().is_some());
    assert!(state.summary().is_some());
    assert!(state.errors().is_empty());
}

#[tokio::test]
async fn test_channel_names_are_case_insensitive() {
    let state = pipeline(None, ChannelDispatcher::simulated())
        .run(brief(&["instagram", "INSTAGRAM"]))
        .await
        .unwrap();

    let publications = state.publications().unwrap();
    assert!(publications["instagram"].starts_with("Published to instagram successfully"));
    assert!(publications["INSTAGRAM"].starts_with("Published to INSTAGRAM successfully"));
}

#[tokio::test]
async fn test_no_credentials_means_every_known_channel_is_simulated() {
    let channels = [
        "Instagram",
        "Facebook",
        "Google Ads",
        "Twitter/X",
        "LinkedIn",
        "TikTok",
        "YouTube",
        "Pinterest",
        "Snapchat",
    ];
    let state = pipeline(None, ChannelDispatcher::simulated())
        .run(brief(&channels))
        .await
        .unwrap();

    let publications = state.publications().unwrap();
    assert_eq!(publications.len(), channels.len());
    for status in publications.values() {
        assert!(status.contains("successfully (simulated)"), "{}", status);
    }
}

#[tokio::test]
async fn test_empty_channels_at_publication_stage() {
    // Bypasses brief validation, as a resumed run would
    let mut brief = brief(&["Instagram"]);
    brief.channels.clear();
    let mut state = CampaignState::from_brief(brief);
    state
        .apply(
            StageKind::ContentCreation,
            StagePartial::update(StageUpdate::Content {
                contents: vec!["**Instagram:**\nSpring sale".to_string()],
                images: vec!["https://cdn.example/hero.png".to_string()],
                drafts: [("Instagram".to_string(), "Spring sale".to_string())]
                    .into_iter()
                    .collect(),
            }),
        )
        .unwrap();

    let pipeline = Pipeline::from_stages(vec![Box::new(PublicationStage::new(
        ChannelDispatcher::simulated(),
    ))]);
    let report = pipeline.run_state(state).await.unwrap();

    assert!(report.state.publications().is_none());
    assert_eq!(report.state.errors(), &[NO_CHANNEL_ERROR]);
    assert_eq!(
        report.stage(StageKind::Publication).unwrap().status,
        StageStatus::Skipped
    );
}

#[tokio::test]
async fn test_empty_channels_skip_content_creation() {
    let mut brief = brief(&["Instagram"]);
    brief.channels.clear();
    let state = pipeline(None, ChannelDispatcher::simulated())
        .run_state(CampaignState::from_brief(brief))
        .await
        .unwrap()
        .state;

    assert!(state.strategy().is_some());
    assert_eq!(
        state.errors(),
        &[
            "channels not found in state",
            "contents not found in state",
            "publications not found in state",
        ]
    );
}

#[tokio::test]
async fn test_research_failure_cascades_as_missing_inputs() {
    let report = pipeline(Some("marketing researcher"), ChannelDispatcher::simulated())
        .run_with_report(brief(&["Instagram"]))
        .await
        .unwrap();

    let state = &report.state;
    assert!(state.research().is_none());
    assert!(state.strategy().is_none());
    assert!(!state.has_contents());
    assert!(state.publications().is_none());
    assert!(state.summary().is_some());
    assert_eq!(
        state.errors(),
        &[
            "research generation failed: API error: rate limited",
            "research not found in state",
            "strategy not found in state",
            "contents not found in state",
            "publications not found in state",
        ]
    );
    assert_eq!(
        report.stage(StageKind::FinalSummary).unwrap().status,
        StageStatus::Completed
    );
}

#[tokio::test]
async fn test_prior_errors_are_kept_in_front() {
    let state = CampaignState::from_brief(brief(&["Instagram"]))
        .with_errors(vec![
            "imported: stale research".to_string(),
            "imported: expired token".to_string(),
        ]);
    let report = pipeline(Some("campaign strategist"), ChannelDispatcher::simulated())
        .run_state(state)
        .await
        .unwrap();

    let errors = report.state.errors();
    assert!(errors.len() >= 2);
    assert_eq!(errors[0], "imported: stale research");
    assert_eq!(errors[1], "imported: expired token");
    assert_eq!(
        errors[2],
        "strategy generation failed: API error: rate limited"
    );
}

#[tokio::test]
async fn test_real_publisher_failure_is_recorded_per_channel() {
    let credentials =
        ProviderCredentials::new().with(Provider::Meta, ProviderConfig::with_token("meta-token"));
    let dispatcher = ChannelDispatcher::new(credentials, &PipelineConfig::default())
        .unwrap()
        .with_publisher(Provider::Meta, Arc::new(RejectingPublisher));

    let state = pipeline(None, dispatcher)
        .run(brief(&["Facebook", "LinkedIn"]))
        .await
        .unwrap();

    let publications = state.publications().unwrap();
    assert_eq!(
        publications["Facebook"],
        "ERROR publishing to Facebook: Publication error: 403 Forbidden"
    );
    assert!(publications["LinkedIn"].contains("successfully (simulated)"));
    assert!(state.optimization().is_some());
}

#[tokio::test]
async fn test_state_serializes_without_absent_fields() {
    let mut brief = brief(&["Instagram"]);
    brief.channels.clear();
    let report = pipeline(Some("marketing researcher"), ChannelDispatcher::simulated())
        .run_state(CampaignState::from_brief(brief))
        .await
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["state"].get("research").is_none());
    assert!(json["state"]["summary"].is_string());
    assert_eq!(json["stages"][0]["stage"], "research");
    assert_eq!(json["stages"][0]["status"], "skipped");
}

#[tokio::test]
async fn test_real_providers_each_post_their_own_channel_text() {
    let meta = Arc::new(RecordingPublisher::default());
    let twitter = Arc::new(RecordingPublisher::default());
    let credentials = ProviderCredentials::new()
        .with(Provider::Meta, ProviderConfig::with_token("meta-token"))
        .with(Provider::Twitter, ProviderConfig::with_token("bearer"));
    let dispatcher = ChannelDispatcher::new(credentials, &PipelineConfig::default())
        .unwrap()
        .with_publisher(Provider::Meta, meta.clone())
        .with_publisher(Provider::Twitter, twitter.clone());

    let state = pipeline(None, dispatcher)
        .run(brief(&["Instagram", "Twitter"]))
        .await
        .unwrap();

    assert_eq!(
        meta.posts(),
        vec![(
            "Instagram".to_string(),
            "echo: You are a content creation specialist for Instagram.".to_string()
        )]
    );
    assert_eq!(
        twitter.posts(),
        vec![(
            "Twitter".to_string(),
            "echo: You are a content creation specialist for Twitter.".to_string()
        )]
    );

    let publications = state.publications().unwrap();
    assert_eq!(
        publications["Twitter"],
        "Published to Twitter via twitter (id: twitter-post)"
    );
    assert!(state.contents()[1].starts_with("**Twitter:**\n"));
}
