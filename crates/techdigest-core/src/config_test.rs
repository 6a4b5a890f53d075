use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.config_path, PathBuf::from("./config.yaml"));
    assert_eq!(cfg.data_dir, PathBuf::from("."));
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.github_token.is_none());
    assert!(cfg.perplexity_api_key.is_none());
    assert!(cfg.anthropic_api_key.is_none());
    assert_eq!(cfg.github_api_url, "https://api.github.com");
    assert_eq!(cfg.perplexity_api_url, "https://api.perplexity.ai");
    assert_eq!(cfg.anthropic_api_url, "https://api.anthropic.com");
    assert_eq!(cfg.github_timeout_secs, 30);
    assert_eq!(cfg.perplexity_timeout_secs, 60);
    assert_eq!(cfg.anthropic_timeout_secs, 120);
}

#[test]
fn build_app_config_reads_credentials() {
    let mut map = HashMap::new();
    map.insert("GITHUB_TOKEN", "gh-token");
    map.insert("PERPLEXITY_API_KEY", "pplx-key");
    map.insert("ANTHROPIC_API_KEY", "sk-ant");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.github_token.as_deref(), Some("gh-token"));
    assert_eq!(cfg.require_perplexity_key().unwrap(), "pplx-key");
    assert_eq!(cfg.require_anthropic_key().unwrap(), "sk-ant");
}

#[test]
fn blank_credentials_are_treated_as_missing() {
    let mut map = HashMap::new();
    map.insert("PERPLEXITY_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.perplexity_api_key.is_none());
}

#[test]
fn require_perplexity_key_fails_when_missing() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let err = cfg.require_perplexity_key().unwrap_err();
    assert!(
        matches!(err, ConfigError::MissingEnvVar(ref v) if v == "PERPLEXITY_API_KEY"),
        "expected MissingEnvVar(PERPLEXITY_API_KEY), got: {err:?}"
    );
}

#[test]
fn require_anthropic_key_fails_when_missing() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let err = cfg.require_anthropic_key().unwrap_err();
    assert!(
        matches!(err, ConfigError::MissingEnvVar(ref v) if v == "ANTHROPIC_API_KEY"),
        "expected MissingEnvVar(ANTHROPIC_API_KEY), got: {err:?}"
    );
}

#[test]
fn build_app_config_overrides_paths_and_urls() {
    let mut map = HashMap::new();
    map.insert("DIGEST_CONFIG_PATH", "/etc/techdigest.yaml");
    map.insert("DIGEST_DATA_DIR", "/var/lib/techdigest");
    map.insert("DIGEST_GITHUB_API_URL", "http://127.0.0.1:9000");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.config_path, PathBuf::from("/etc/techdigest.yaml"));
    assert_eq!(cfg.data_dir, PathBuf::from("/var/lib/techdigest"));
    assert_eq!(cfg.github_api_url, "http://127.0.0.1:9000");
}

#[test]
fn build_app_config_timeout_override() {
    let mut map = HashMap::new();
    map.insert("DIGEST_PERPLEXITY_TIMEOUT_SECS", "90");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.perplexity_timeout_secs, 90);
}

#[test]
fn build_app_config_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("DIGEST_GITHUB_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DIGEST_GITHUB_TIMEOUT_SECS"),
        "expected InvalidEnvVar(DIGEST_GITHUB_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = HashMap::new();
    map.insert("ANTHROPIC_API_KEY", "sk-ant-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("sk-ant-secret"));
    assert!(rendered.contains("[redacted]"));
}
