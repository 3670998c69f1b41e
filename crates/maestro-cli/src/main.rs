//! Maestro CLI - multi-channel campaign pipeline
//!
//! Usage:
//!   maestro run --objective .. --audience .. --channel .. --budget ..
//!   maestro init [PATH]       Write a default .maestro/config.toml
//!   maestro channels          List supported channels

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use maestro_agent::{GenerationAdapter, Generator, OfflineGenerator, OpenAiClient};
use maestro_core::{CampaignBrief, Channel, ContentTemplate, MaestroConfig};
use maestro_orchestrator::Pipeline;
use maestro_publisher::ChannelDispatcher;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "maestro")]
#[command(author, version, about = "Multi-channel marketing campaign pipeline")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to .maestro/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full campaign
    Run {
        /// What the campaign should achieve
        #[arg(long)]
        objective: String,

        /// Who the campaign targets
        #[arg(long)]
        audience: String,

        /// Channel to publish on (repeatable, order is kept)
        #[arg(short, long = "channel", value_name = "CHANNEL")]
        channels: Vec<String>,

        /// Campaign budget
        #[arg(long, default_value = "0")]
        budget: f64,

        /// Use the offline generator instead of the OpenAI API
        #[arg(long)]
        offline: bool,

        /// Write the final summary to this file
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Write a default configuration
    Init {
        /// Project path (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// List supported channels and provider status
    Channels,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, ignored) = load_config(cli.config.as_deref())?;

    // Setup logging
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if cli.verbose => EnvFilter::new("debug"),
        Err(_) => EnvFilter::new(config.log_filter()),
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    for message in &ignored {
        warn!("{}", message);
    }

    match cli.command {
        Commands::Run {
            objective,
            audience,
            channels,
            budget,
            offline,
            report,
        } => {
            let brief = CampaignBrief::new(objective, audience, channels, budget);
            cmd_run(config, brief, offline, report).await
        }
        Commands::Init { path } => cmd_init(&path),
        Commands::Channels => cmd_channels(&config),
    }
}

/// Load the config file and apply env overrides
///
/// Runs before logging is installed; rejected overrides come back as
/// messages to log afterwards.
fn load_config(path: Option<&Path>) -> Result<(MaestroConfig, Vec<String>)> {
    let mut config = match path {
        Some(path) => MaestroConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => MaestroConfig::load_or_default(Path::new("."))?,
    };
    let ignored = config.apply_env_overrides(|key| std::env::var(key).ok());
    Ok((config, ignored))
}

async fn cmd_run(
    config: MaestroConfig,
    brief: CampaignBrief,
    offline: bool,
    report: Option<PathBuf>,
) -> Result<()> {
    let generator: Arc<dyn Generator> = if offline {
        info!("Using offline generator");
        Arc::new(OfflineGenerator::new())
    } else {
        Arc::new(
            OpenAiClient::from_env(config.generation.clone())
                .context("Failed to create generation client")?,
        )
    };
    info!("Running in {} environment", config.environment);
    let timeout = Duration::from_secs(config.pipeline.call_timeout_secs);
    let adapter = GenerationAdapter::new(generator, timeout);
    let dispatcher = ChannelDispatcher::new(config.providers.clone(), &config.pipeline)?;

    let configured = dispatcher.credentials().configured();
    if configured.is_empty() {
        info!("No provider credentials configured, publications are simulated");
    } else {
        info!("Configured providers: {:?}", configured);
    }

    let pipeline = Pipeline::standard(adapter, dispatcher, &config.pipeline);
    let result = pipeline.run_with_report(brief).await?;

    for error in result.state.errors() {
        warn!("{}", error);
    }

    println!("{}", serde_json::to_string_pretty(&result.state)?);

    if let Some(path) = report {
        let summary = result.state.summary().unwrap_or_default();
        std::fs::write(&path, summary)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Summary written to {}", path.display());
    }

    Ok(())
}

fn cmd_init(path: &Path) -> Result<()> {
    let written = MaestroConfig::write_default(path)?;
    println!("Wrote default configuration to {}", written.display());
    Ok(())
}

fn cmd_channels(config: &MaestroConfig) -> Result<()> {
    println!("{:<12} {:<12} {:<10} PUBLISHING", "CHANNEL", "PROVIDER", "LIMIT");
    for channel in Channel::KNOWN {
        let template = ContentTemplate::for_channel(channel);
        let limit = template
            .char_limit
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        let (provider, mode) = match channel.provider() {
            Some(p) if config.providers.is_configured(p) => (p.to_string(), "real"),
            Some(p) => (p.to_string(), "simulated"),
            None => ("-".to_string(), "unsupported"),
        };
        println!("{:<12} {:<12} {:<10} {}", channel.to_string(), provider, limit, mode);
    }
    Ok(())
}
