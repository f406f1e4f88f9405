//! Gitea Checks - publish build check results as Gitea commit statuses
//!
//! The `gitea-checks` command resolves which Gitea repository and commit a
//! build belongs to and reports check results there.
//!
//! ## Commands
//!
//! - `publish`: Publish a check result (JSON) for the job described by a TOML file
//! - `resolve`: Show which repository, commit and server a job resolves to

mod config;
mod facade;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gitea_checks_api::ChecksDetails;
use gitea_checks_core::{
    BuildLog, ClassicUrlProvider, GiteaChecksPublisher, GiteaPublisherFactory, PublishOutcome,
    StdoutBuildLog,
};
use serde_json::json;
use tracing::{info, warn, Level};

use crate::config::JobConfig;
use crate::facade::ConfiguredScmFacade;

#[derive(Parser)]
#[command(name = "gitea-checks")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Publish build checks as Gitea commit statuses", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a check result
    Publish {
        /// Job description (TOML)
        #[arg(short, long, env = "GITEA_CHECKS_JOB")]
        job: PathBuf,

        /// Check result (JSON)
        #[arg(short, long)]
        check: PathBuf,

        /// Publish against this server instead of the resolved one
        #[arg(long)]
        server_url: Option<String>,
    },

    /// Resolve the checks context of a job without publishing
    Resolve {
        /// Job description (TOML)
        #[arg(short, long, env = "GITEA_CHECKS_JOB")]
        job: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    gitea_checks_core::telemetry::init_tracing(cli.json, level);

    let console: Arc<dyn BuildLog> = Arc::new(StdoutBuildLog);
    match cli.command {
        Commands::Publish {
            job,
            check,
            server_url,
        } => cmd_publish(&job, &check, server_url, console).await,
        Commands::Resolve { job } => cmd_resolve(&job, console).await,
    }
}

async fn create_publisher(
    config: &JobConfig,
    console: Arc<dyn BuildLog>,
) -> Result<Option<GiteaChecksPublisher>> {
    let credentials = config.credentials_from_env()?;
    let facade = Arc::new(ConfiguredScmFacade::new(config, credentials));
    let factory = GiteaPublisherFactory::new(
        facade,
        Arc::new(ClassicUrlProvider::new(&config.root_url)),
    );

    let publisher = match config.run() {
        Some(run) => factory.create_publisher_for_run(&run, console).await,
        None => factory.create_publisher_for_job(&config.job(), console).await,
    };
    Ok(publisher)
}

fn read_check(path: &Path) -> Result<ChecksDetails> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read check file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid check JSON in {:?}", path))
}

async fn cmd_publish(
    job_path: &Path,
    check_path: &Path,
    server_url: Option<String>,
    console: Arc<dyn BuildLog>,
) -> Result<()> {
    let config = JobConfig::load(job_path)?;
    let details = read_check(check_path)?;

    let Some(mut publisher) = create_publisher(&config, console).await? else {
        anyhow::bail!("No suitable Gitea checks publisher for job '{}'", config.job.name);
    };
    if let Some(url) = server_url {
        publisher = publisher.with_server_url(url);
    }

    match publisher
        .publish_status(&details)
        .await
        .context("Check was not published")?
    {
        PublishOutcome::Published(status) => {
            info!(context = %status.context(), state = %status.state(), "Check published");
        }
        PublishOutcome::Failed { error, .. } => {
            // Dropped checks never fail the build.
            warn!(%error, "Check was dropped");
        }
    }
    Ok(())
}

async fn cmd_resolve(job_path: &Path, console: Arc<dyn BuildLog>) -> Result<()> {
    let config = JobConfig::load(job_path)?;

    let Some(publisher) = create_publisher(&config, console).await? else {
        anyhow::bail!("No suitable Gitea checks publisher for job '{}'", config.job.name);
    };

    let context = publisher.context();
    let resolved = json!({
        "server_url": publisher.server_url(),
        "repository": context.repository()?,
        "head_sha": context.head_sha()?,
        "credentials_id": context.credentials_id(),
        "url": context.url(),
    });
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}
