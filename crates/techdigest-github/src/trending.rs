//! Star-velocity ranking of freshly created repositories.
//!
//! The search API orders by raw star count; this module re-ranks the page
//! by stars per day since creation so young repositories that are climbing
//! fast come first.

use chrono::{DateTime, Duration, Utc};
use techdigest_core::{GithubSettings, TrendingItem};

use crate::client::GithubClient;
use crate::error::GithubError;
use crate::types::{RepoSearchItem, SearchParams};

/// Age floor in days (~2.4 hours) so brand-new repositories do not divide
/// by almost zero.
pub const MIN_AGE_DAYS: f64 = 0.1;

const MAX_PER_PAGE: u32 = 100;
const SECS_PER_DAY: f64 = 86_400.0;

/// Search request for repositories created in the last
/// `settings.lookback_days` with more than `settings.min_stars` stars.
#[must_use]
pub fn build_search_query(settings: &GithubSettings, now: DateTime<Utc>) -> SearchParams {
    let since = (now - Duration::days(i64::from(settings.lookback_days)))
        .format("%Y-%m-%d")
        .to_string();

    SearchParams {
        q: format!("created:>{since} stars:>{}", settings.min_stars),
        sort: "stars".to_string(),
        order: "desc".to_string(),
        per_page: settings.limit.min(MAX_PER_PAGE),
    }
}

/// Age of a repository in fractional days, floored at [`MIN_AGE_DAYS`].
#[must_use]
pub fn days_old(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let secs = (now - created_at).num_milliseconds() as f64 / 1000.0;
    (secs / SECS_PER_DAY).max(MIN_AGE_DAYS)
}

/// Stars per day, rounded to one decimal.
#[must_use]
pub fn star_velocity(stars: u64, days_old: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let stars = stars as f64;
    round1(stars / days_old)
}

/// Correctly rounded to one decimal: the exact binary value is rounded,
/// ties to even.
fn round1(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

fn to_trending_item(item: RepoSearchItem, now: DateTime<Utc>) -> TrendingItem {
    let age = days_old(item.created_at, now);
    TrendingItem {
        star_velocity: star_velocity(item.stargazers_count, age),
        days_old: round1(age),
        name: item.full_name,
        description: item.description.unwrap_or_default(),
        stars: item.stargazers_count,
        forks: item.forks_count,
        language: item.language.unwrap_or_else(|| "Unknown".to_string()),
        url: item.html_url,
        created_at: item.created_at,
        topics: item.topics,
    }
}

/// Derive ranking fields, sort by star velocity descending, keep `top_n`.
///
/// The sort is stable: repositories with equal velocity keep the API's
/// star-count order.
#[must_use]
pub fn rank_trending(
    items: Vec<RepoSearchItem>,
    now: DateTime<Utc>,
    top_n: usize,
) -> Vec<TrendingItem> {
    let mut ranked: Vec<TrendingItem> = items
        .into_iter()
        .map(|item| to_trending_item(item, now))
        .collect();
    ranked.sort_by(|a, b| b.star_velocity.total_cmp(&a.star_velocity));
    ranked.truncate(top_n);
    ranked
}

/// Search GitHub and return the top repositories by star velocity.
///
/// # Errors
///
/// Returns [`GithubError`] if the search request fails. There is no retry.
pub async fn fetch_trending(
    client: &GithubClient,
    settings: &GithubSettings,
    now: DateTime<Utc>,
) -> Result<Vec<TrendingItem>, GithubError> {
    let params = build_search_query(settings, now);
    tracing::info!(
        lookback_days = settings.lookback_days,
        min_stars = settings.min_stars,
        per_page = params.per_page,
        "searching github for trending repositories"
    );

    let items = client.search_repositories(&params).await?;
    let fetched = items.len();
    let ranked = rank_trending(items, now, settings.top_n);

    tracing::info!(fetched, kept = ranked.len(), "ranked trending repositories");
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap()
    }

    fn item(name: &str, stars: u64, created_at: DateTime<Utc>) -> RepoSearchItem {
        RepoSearchItem {
            full_name: name.to_string(),
            description: None,
            stargazers_count: stars,
            forks_count: 1,
            language: None,
            html_url: format!("https://github.com/{name}"),
            created_at,
            topics: Vec::new(),
        }
    }

    #[test]
    fn build_search_query_uses_lookback_and_threshold() {
        let settings = GithubSettings {
            lookback_days: 7,
            min_stars: 50,
            limit: 30,
            top_n: 15,
        };
        let params = build_search_query(&settings, now());
        assert_eq!(params.q, "created:>2026-01-03 stars:>50");
        assert_eq!(params.sort, "stars");
        assert_eq!(params.order, "desc");
        assert_eq!(params.per_page, 30);
    }

    #[test]
    fn build_search_query_caps_page_size() {
        let settings = GithubSettings {
            limit: 500,
            ..GithubSettings::default()
        };
        assert_eq!(build_search_query(&settings, now()).per_page, 100);
    }

    #[test]
    fn days_old_is_fractional() {
        let created = now() - Duration::hours(36);
        assert!((days_old(created, now()) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn days_old_is_floored_for_brand_new_repos() {
        let created = now() - Duration::minutes(5);
        assert!((days_old(created, now()) - MIN_AGE_DAYS).abs() < f64::EPSILON);
    }

    #[test]
    fn days_old_is_floored_for_future_timestamps() {
        let created = now() + Duration::hours(1);
        assert!((days_old(created, now()) - MIN_AGE_DAYS).abs() < f64::EPSILON);
    }

    #[test]
    fn star_velocity_rounds_to_one_decimal() {
        assert!((star_velocity(100, 3.0) - 33.3).abs() < 1e-9);
        assert!((star_velocity(50, 0.1) - 500.0).abs() < 1e-9);
        assert!((star_velocity(7, 2.0) - 3.5).abs() < 1e-9);
    }

    #[test]
    fn star_velocity_rounds_exact_value_half_to_even() {
        // 401 / 4 is exactly 100.25; 3 / 20 is just below 0.15 in binary.
        assert!((star_velocity(401, 4.0) - 100.2).abs() < 1e-9);
        assert!((star_velocity(3, 20.0) - 0.1).abs() < 1e-9);
        assert!((star_velocity(5, 4.0) - 1.2).abs() < 1e-9);
    }

    #[test]
    fn rank_trending_reorders_by_velocity() {
        let items = vec![
            item("old/popular", 1000, now() - Duration::days(100)),
            item("new/rising", 300, now() - Duration::days(1)),
            item("mid/steady", 500, now() - Duration::days(5)),
        ];
        let ranked = rank_trending(items, now(), 10);
        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["new/rising", "mid/steady", "old/popular"]);
        assert!((ranked[0].star_velocity - 300.0).abs() < 1e-9);
        assert!((ranked[2].star_velocity - 10.0).abs() < 1e-9);
    }

    #[test]
    fn rank_trending_output_is_non_increasing() {
        let items: Vec<RepoSearchItem> = (1..=20_i64)
            .map(|i| {
                let stars = 60 + u64::try_from(i * 37 % 400).unwrap();
                item(&format!("r/{i}"), stars, now() - Duration::hours(i * 7))
            })
            .collect();
        let ranked = rank_trending(items, now(), 20);
        assert!(ranked
            .windows(2)
            .all(|w| w[0].star_velocity >= w[1].star_velocity));
    }

    #[test]
    fn rank_trending_truncates_to_top_n() {
        let items: Vec<RepoSearchItem> = (0..5)
            .map(|i| item(&format!("r/{i}"), 100 + i, now() - Duration::days(2)))
            .collect();
        assert_eq!(rank_trending(items.clone(), now(), 3).len(), 3);
        assert_eq!(rank_trending(items, now(), 15).len(), 5);
    }

    #[test]
    fn rank_trending_is_stable_on_ties() {
        let items = vec![
            item("first/tie", 200, now() - Duration::days(2)),
            item("second/tie", 200, now() - Duration::days(2)),
        ];
        let ranked = rank_trending(items, now(), 2);
        assert_eq!(ranked[0].name, "first/tie");
        assert_eq!(ranked[1].name, "second/tie");
    }

    #[test]
    fn missing_optional_fields_get_defaults() {
        let ranked = rank_trending(vec![item("a/b", 10, now() - Duration::days(1))], now(), 1);
        assert_eq!(ranked[0].description, "");
        assert_eq!(ranked[0].language, "Unknown");
        assert!((ranked[0].days_old - 1.0).abs() < 1e-9);
    }
}
