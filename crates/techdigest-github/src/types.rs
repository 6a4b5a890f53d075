//! GitHub search API request and response types.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Response envelope of `GET /search/repositories`.
#[derive(Debug, Deserialize)]
pub struct RepoSearchResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<RepoSearchItem>,
}

/// The subset of a repository search hit the trending stage uses.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoSearchItem {
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    #[serde(default)]
    pub language: Option<String>,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Query parameters for one repository search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Search qualifier string, e.g. `created:>2026-01-01 stars:>50`.
    pub q: String,
    pub sort: String,
    pub order: String,
    pub per_page: u32,
}
