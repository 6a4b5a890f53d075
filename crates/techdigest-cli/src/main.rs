mod all;
mod community;
mod output;
mod summarize;
mod trending;

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use techdigest_core::{AppConfig, RunContext};
use techdigest_github::GithubClient;
use techdigest_llm::{AnthropicClient, PerplexityClient};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "techdigest")]
#[command(about = "Daily AI tech digest: GitHub trending, community reactions, summary")]
struct Cli {
    /// Date key to read/write (YYYY-MM-DD); defaults to today in UTC+9
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    /// Pipeline config file; overrides DIGEST_CONFIG_PATH
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rank recently created GitHub repositories by star velocity
    Trending,
    /// Ask every configured topic query and render the raw digest
    Community,
    /// Condense the day's raw answers into the summary digest
    Summarize,
    /// Run trending, community, and summarize in order
    All,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app = techdigest_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(app.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("techdigest: choose a stage (trending, community, summarize, all); see --help");
        return Ok(());
    };

    let config_path = cli.config.unwrap_or_else(|| app.config_path.clone());
    let pipeline = techdigest_core::load_pipeline_config(&config_path)?;
    let mut ctx = RunContext::new(Utc::now(), pipeline, app.data_dir.clone());
    if let Some(date) = cli.date {
        ctx = ctx.with_date(date);
    }
    tracing::debug!(?app, date = %ctx.date_key(), "run context ready");

    match command {
        Commands::Trending => {
            trending::run_trending(&ctx, &github_client(&app)?).await?;
        }
        Commands::Community => {
            community::run_community(&ctx, &perplexity_client(&app)?).await?;
        }
        Commands::Summarize => {
            summarize::run_summarize(&ctx, &anthropic_client(&app)?).await?;
        }
        Commands::All => {
            // Build every client first so a missing key fails before any request.
            let github = github_client(&app)?;
            let perplexity = perplexity_client(&app)?;
            let anthropic = anthropic_client(&app)?;

            all::run_all(&ctx, &github, &perplexity, &anthropic).await?;
        }
    }

    Ok(())
}

fn github_client(app: &AppConfig) -> anyhow::Result<GithubClient> {
    Ok(GithubClient::with_base_url(
        app.github_token.as_deref(),
        app.github_timeout_secs,
        &app.github_api_url,
    )?)
}

fn perplexity_client(app: &AppConfig) -> anyhow::Result<PerplexityClient> {
    let key = app.require_perplexity_key()?;
    Ok(PerplexityClient::with_base_url(
        key,
        app.perplexity_timeout_secs,
        &app.perplexity_api_url,
    )?)
}

fn anthropic_client(app: &AppConfig) -> anyhow::Result<AnthropicClient> {
    let key = app.require_anthropic_key()?;
    Ok(AnthropicClient::with_base_url(
        key,
        app.anthropic_timeout_secs,
        &app.anthropic_api_url,
    )?)
}
