use crate::app_config::{
    AppConfig, DEFAULT_ANTHROPIC_API_URL, DEFAULT_GITHUB_API_URL, DEFAULT_PERPLEXITY_API_URL,
};
use crate::ConfigError;

/// Load application settings from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application settings from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build settings from an env-var lookup function so tests can drive it
/// with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank secrets are treated as unset.
    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let config_path = PathBuf::from(or_default("DIGEST_CONFIG_PATH", "./config.yaml"));
    let data_dir = PathBuf::from(or_default("DIGEST_DATA_DIR", "."));
    let log_level = or_default("DIGEST_LOG_LEVEL", "info");

    let github_token = optional("GITHUB_TOKEN");
    let perplexity_api_key = optional("PERPLEXITY_API_KEY");
    let anthropic_api_key = optional("ANTHROPIC_API_KEY");

    let github_api_url = or_default("DIGEST_GITHUB_API_URL", DEFAULT_GITHUB_API_URL);
    let perplexity_api_url = or_default("DIGEST_PERPLEXITY_API_URL", DEFAULT_PERPLEXITY_API_URL);
    let anthropic_api_url = or_default("DIGEST_ANTHROPIC_API_URL", DEFAULT_ANTHROPIC_API_URL);

    let github_timeout_secs = parse_u64("DIGEST_GITHUB_TIMEOUT_SECS", "30")?;
    let perplexity_timeout_secs = parse_u64("DIGEST_PERPLEXITY_TIMEOUT_SECS", "60")?;
    let anthropic_timeout_secs = parse_u64("DIGEST_ANTHROPIC_TIMEOUT_SECS", "120")?;

    Ok(AppConfig {
        config_path,
        data_dir,
        log_level,
        github_token,
        perplexity_api_key,
        anthropic_api_key,
        github_api_url,
        perplexity_api_url,
        anthropic_api_url,
        github_timeout_secs,
        perplexity_timeout_secs,
        anthropic_timeout_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
