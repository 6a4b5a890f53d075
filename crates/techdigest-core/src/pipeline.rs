//! Pipeline configuration document (`config.yaml`).
//!
//! One file drives all three stages: trending search parameters, the topic
//! sections and their queries, summarization prompts, and the free-form
//! `context` mapping used to fill query templates.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub digest: DigestSettings,
    #[serde(default)]
    pub github: GithubSettings,
    pub perplexity: PerplexitySettings,
    pub sections: Vec<SectionConfig>,
    pub summary: SummarySettings,
    #[serde(default)]
    pub context: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestSettings {
    #[serde(default = "default_digest_title")]
    pub title: String,
}

impl Default for DigestSettings {
    fn default() -> Self {
        Self {
            title: default_digest_title(),
        }
    }
}

fn default_digest_title() -> String {
    "AI Tech Digest".to_string()
}

/// Search window and ranking cut-offs for the trending stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubSettings {
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    #[serde(default = "default_min_stars")]
    pub min_stars: u32,
    /// Number of search results requested (capped at 100 per page).
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Number of items kept after re-ranking by star velocity.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            lookback_days: default_lookback_days(),
            min_stars: default_min_stars(),
            limit: default_limit(),
            top_n: default_top_n(),
        }
    }
}

fn default_lookback_days() -> u32 {
    7
}

fn default_min_stars() -> u32 {
    50
}

fn default_limit() -> u32 {
    30
}

fn default_top_n() -> usize {
    15
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerplexitySettings {
    pub model: String,
    /// Search recency filter, e.g. `day`, `week`, `month`.
    pub recency: String,
    pub system_prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    pub title: String,
    #[serde(default)]
    pub emoji: String,
    pub queries: Vec<QueryConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    pub id: String,
    pub title: String,
    /// Query template; `{name}` placeholders are filled from `context`.
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarySettings {
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    pub system: String,
    /// Closing instructions appended to the composite prompt. `{date}` is
    /// available in addition to the `context` bindings.
    #[serde(default)]
    pub output_format: String,
}

fn default_max_tokens() -> u32 {
    4096
}

impl PipelineConfig {
    /// All queries across all sections, in declared order.
    pub fn all_queries(&self) -> impl Iterator<Item = &QueryConfig> {
        self.sections.iter().flat_map(|s| s.queries.iter())
    }
}

/// Load and validate the pipeline configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_pipeline_config(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_pipeline_config(&content)
}

/// Parse and validate a pipeline configuration from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_pipeline_config(content: &str) -> Result<PipelineConfig, ConfigError> {
    let config: PipelineConfig = serde_yaml::from_str(content)?;
    validate_pipeline(&config)?;
    Ok(config)
}

fn validate_pipeline(config: &PipelineConfig) -> Result<(), ConfigError> {
    if config.sections.is_empty() {
        return Err(ConfigError::Validation(
            "at least one section must be configured".to_string(),
        ));
    }

    if config.github.top_n == 0 {
        return Err(ConfigError::Validation(
            "github.top_n must be greater than zero".to_string(),
        ));
    }

    if config.github.limit == 0 {
        return Err(ConfigError::Validation(
            "github.limit must be greater than zero".to_string(),
        ));
    }

    if config.summary.max_tokens == 0 {
        return Err(ConfigError::Validation(
            "summary.max_tokens must be greater than zero".to_string(),
        ));
    }

    let mut seen_ids = HashSet::new();
    for section in &config.sections {
        if section.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "section title must be non-empty".to_string(),
            ));
        }

        for query in &section.queries {
            if query.id.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "query in section '{}' has an empty id",
                    section.title
                )));
            }
            if !seen_ids.insert(query.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate query id: '{}'",
                    query.id
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
