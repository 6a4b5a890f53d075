//! HTTP client for the GitHub repository search API.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, Url};

use crate::error::GithubError;
use crate::types::{RepoSearchItem, RepoSearchResponse, SearchParams};

const DEFAULT_BASE_URL: &str = "https://api.github.com/";
const ACCEPT_GITHUB_V3: &str = "application/vnd.github.v3+json";

/// Client for GitHub's REST search endpoint.
///
/// Anonymous access works with a lower rate limit; pass a token to
/// authenticate. Use [`GithubClient::with_base_url`] to point at a mock
/// server in tests.
pub struct GithubClient {
    client: Client,
    token: Option<String>,
    base_url: Url,
}

impl GithubClient {
    /// Creates a new client pointed at `api.github.com`.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: Option<&str>, timeout_secs: u64) -> Result<Self, GithubError> {
        Self::with_base_url(token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`GithubError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        token: Option<&str>,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GithubError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("techdigest/0.1 (github-trending)")
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GithubError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            token: token.map(str::to_owned),
            base_url,
        })
    }

    /// Runs one repository search and returns the hits in API order.
    ///
    /// # Errors
    ///
    /// - [`GithubError::Http`] on network failure or non-2xx HTTP status.
    /// - [`GithubError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn search_repositories(
        &self,
        params: &SearchParams,
    ) -> Result<Vec<RepoSearchItem>, GithubError> {
        let url = self.search_url(params)?;

        let mut request = self.client.get(url.clone()).header(ACCEPT, ACCEPT_GITHUB_V3);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?.error_for_status()?;
        let body = response.text().await?;
        let parsed: RepoSearchResponse =
            serde_json::from_str(&body).map_err(|e| GithubError::Deserialize {
                context: format!("search/repositories(q={})", params.q),
                source: e,
            })?;

        tracing::debug!(
            total_count = parsed.total_count,
            returned = parsed.items.len(),
            "github search completed"
        );
        Ok(parsed.items)
    }

    /// Builds `{base}/search/repositories?q=..&sort=..&order=..&per_page=..`
    /// with percent-encoded values.
    fn search_url(&self, params: &SearchParams) -> Result<Url, GithubError> {
        let mut url =
            self.base_url
                .join("search/repositories")
                .map_err(|e| GithubError::InvalidBaseUrl {
                    url: self.base_url.to_string(),
                    reason: e.to_string(),
                })?;
        url.query_pairs_mut()
            .append_pair("q", &params.q)
            .append_pair("sort", &params.sort)
            .append_pair("order", &params.order)
            .append_pair("per_page", &params.per_page.to_string());
        Ok(url)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
