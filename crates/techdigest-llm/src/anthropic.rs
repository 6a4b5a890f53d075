//! Anthropic Messages API client used for the final summary.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::base_url::endpoint_url;
use crate::error::LlmError;
use crate::perplexity::ChatMessage;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const PROVIDER: &str = "anthropic";

/// Body of `POST /v1/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct MessageRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system: String,
    pub messages: Vec<ChatMessage>,
}

impl MessageRequest {
    /// Single-turn request: one system instruction, one user prompt.
    #[must_use]
    pub fn single_turn(model: &str, max_tokens: u32, system: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            max_tokens,
            system: system.to_string(),
            messages: vec![ChatMessage::user(prompt)],
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: MessageUsage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MessageUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

/// Summarizer output and its token accounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

pub struct AnthropicClient {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl AnthropicClient {
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, LlmError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

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
            .user_agent("techdigest/0.1 (summarizer)")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint: endpoint_url(base_url, "v1/messages")?,
        })
    }

    /// Send one message request. Text blocks in the reply are concatenated.
    ///
    /// # Errors
    ///
    /// - [`LlmError::Http`] on network failure, timeout, or non-2xx status.
    /// - [`LlmError::Deserialize`] if the body is not the expected JSON.
    /// - [`LlmError::EmptyResponse`] if the reply has no text block.
    pub async fn create_message(&self, request: &MessageRequest) -> Result<Summary, LlmError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(request)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        tracing::debug!(model = %request.model, bytes = body.len(), "anthropic response received");

        let parsed: MessageResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Deserialize {
                context: format!("v1/messages(model={})", request.model),
                source: e,
            })?;

        let texts: Vec<String> = parsed
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();
        if texts.is_empty() {
            return Err(LlmError::EmptyResponse { provider: PROVIDER });
        }

        Ok(Summary {
            text: texts.concat(),
            model: parsed.model.unwrap_or_else(|| request.model.clone()),
            input_tokens: parsed.usage.input_tokens,
            output_tokens: parsed.usage.output_tokens,
        })
    }
}
