use std::path::PathBuf;

use crate::ConfigError;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_PERPLEXITY_API_URL: &str = "https://api.perplexity.ai";
pub const DEFAULT_ANTHROPIC_API_URL: &str = "https://api.anthropic.com";

/// Process-level settings read from the environment.
///
/// API keys are optional here; each stage asks for the key it needs through
/// the `require_*` accessors so a missing credential fails before any
/// request is made.
#[derive(Clone)]
pub struct AppConfig {
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
    pub log_level: String,
    pub github_token: Option<String>,
    pub perplexity_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub github_api_url: String,
    pub perplexity_api_url: String,
    pub anthropic_api_url: String,
    pub github_timeout_secs: u64,
    pub perplexity_timeout_secs: u64,
    pub anthropic_timeout_secs: u64,
}

impl AppConfig {
    /// Returns the Perplexity API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `PERPLEXITY_API_KEY` was not set.
    pub fn require_perplexity_key(&self) -> Result<&str, ConfigError> {
        self.perplexity_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("PERPLEXITY_API_KEY".to_string()))
    }

    /// Returns the Anthropic API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `ANTHROPIC_API_KEY` was not set.
    pub fn require_anthropic_key(&self) -> Result<&str, ConfigError> {
        self.anthropic_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("ANTHROPIC_API_KEY".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("config_path", &self.config_path)
            .field("data_dir", &self.data_dir)
            .field("log_level", &self.log_level)
            .field(
                "github_token",
                &self.github_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "perplexity_api_key",
                &self.perplexity_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "anthropic_api_key",
                &self.anthropic_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("github_api_url", &self.github_api_url)
            .field("perplexity_api_url", &self.perplexity_api_url)
            .field("anthropic_api_url", &self.anthropic_api_url)
            .field("github_timeout_secs", &self.github_timeout_secs)
            .field("perplexity_timeout_secs", &self.perplexity_timeout_secs)
            .field("anthropic_timeout_secs", &self.anthropic_timeout_secs)
            .finish()
    }
}
