//! Completion API clients for the techdigest pipeline.
//!
//! [`PerplexityClient`] answers topic queries with live web search and
//! returns citations; [`AnthropicClient`] condenses the day's answers into
//! the final summary.

pub mod anthropic;
pub mod error;
pub mod perplexity;

mod base_url;

pub use anthropic::{AnthropicClient, MessageRequest, Summary};
pub use error::LlmError;
pub use perplexity::{ChatMessage, PerplexityClient, SearchCompletion, SearchCompletionRequest};
