//! `trending` stage: GitHub search, star-velocity re-rank, merge into the raw snapshot.

use techdigest_core::{RunContext, SnapshotStore, TrendingItem};
use techdigest_github::GithubClient;

use crate::output::truncate_chars;

const PREVIEW_COUNT: usize = 5;
const PREVIEW_DESCRIPTION_CHARS: usize = 60;

/// Fetch, rank, and merge today's trending repositories under
/// `github_trending`.
///
/// # Errors
///
/// Any HTTP or snapshot error is fatal; nothing is retried.
pub(crate) async fn run_trending(
    ctx: &RunContext,
    client: &GithubClient,
) -> anyhow::Result<Vec<TrendingItem>> {
    let date = ctx.date_key();
    let settings = &ctx.config.github;
    println!("[{date}] GitHub trending collection started");
    println!(
        "  searching GitHub... (last {} days, min {}\u{2605})",
        settings.lookback_days, settings.min_stars
    );

    let trending = techdigest_github::fetch_trending(client, settings, ctx.now).await?;

    let store = SnapshotStore::new(ctx.raw_dir());
    let items = trending.clone();
    store.merge(&date, move |snapshot| {
        snapshot.github_trending = Some(items);
    })?;
    println!(
        "  \u{2192} github_trending merged: {} ({} repos)",
        store.path(&date).display(),
        trending.len()
    );

    println!("[done] repositories collected: {}", trending.len());
    for (i, repo) in trending.iter().take(PREVIEW_COUNT).enumerate() {
        println!(
            "  {}. {} \u{2605}{} ({}\u{2605}/day) \u{2014} {}",
            i + 1,
            repo.name,
            repo.stars,
            repo.star_velocity,
            truncate_chars(&repo.description, PREVIEW_DESCRIPTION_CHARS)
        );
    }

    Ok(trending)
}
