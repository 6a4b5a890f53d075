//! `all`: every stage in order for one date.

use techdigest_core::RunContext;
use techdigest_github::GithubClient;
use techdigest_llm::{AnthropicClient, PerplexityClient};

use crate::{community, summarize, trending};

/// Run trending, community, and summarize.
///
/// Trending feeds nothing downstream, so its failure is reported and the
/// other stages still run; the error is returned once they finish.
///
/// # Errors
///
/// Community and summarize errors abort immediately. A trending error is
/// returned after the remaining stages complete.
pub(crate) async fn run_all(
    ctx: &RunContext,
    github: &GithubClient,
    perplexity: &PerplexityClient,
    anthropic: &AnthropicClient,
) -> anyhow::Result<()> {
    let trending_result = trending::run_trending(ctx, github).await;
    if let Err(e) = &trending_result {
        tracing::error!(error = %e, "trending stage failed; continuing with community");
        println!("  \u{2717} trending: {e}");
    }

    community::run_community(ctx, perplexity).await?;
    summarize::run_summarize(ctx, anthropic).await?;

    trending_result.map(|_| ())
}
