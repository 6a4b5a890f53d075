//! Perplexity chat-completions client (search-augmented answers).

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use techdigest_core::Usage;

use crate::base_url::endpoint_url;
use crate::error::LlmError;

const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";
const PROVIDER: &str = "perplexity";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// `day`, `week`, `month`, ...
    pub search_recency_filter: String,
    pub return_citations: bool,
}

impl SearchCompletionRequest {
    /// System + user message pair with citations enabled.
    #[must_use]
    pub fn new(model: &str, system_prompt: &str, question: &str, recency: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(question)],
            search_recency_filter: recency.to_string(),
            return_citations: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    citations: Vec<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// One answer with its sources.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCompletion {
    pub answer: String,
    pub citations: Vec<String>,
    /// Model reported by the API, if any.
    pub model: Option<String>,
    pub usage: Usage,
}

pub struct PerplexityClient {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl PerplexityClient {
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, LlmError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Client against a custom base URL (proxies, wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`LlmError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("techdigest/0.1 (community-digest)")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint: endpoint_url(base_url, "chat/completions")?,
        })
    }

    /// Send one completion request and return the first choice with its
    /// citations.
    ///
    /// # Errors
    ///
    /// - [`LlmError::Http`] on network failure, timeout, or non-2xx status.
    /// - [`LlmError::Deserialize`] if the body is not the expected JSON.
    /// - [`LlmError::EmptyResponse`] if the response has no choices.
    pub async fn complete(
        &self,
        request: &SearchCompletionRequest,
    ) -> Result<SearchCompletion, LlmError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        tracing::debug!(model = %request.model, bytes = body.len(), "perplexity response received");

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Deserialize {
                context: format!("chat/completions(model={})", request.model),
                source: e,
            })?;

        let answer = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse { provider: PROVIDER })?;

        Ok(SearchCompletion {
            answer,
            citations: parsed.citations,
            model: parsed.model,
            usage: parsed.usage,
        })
    }
}
