//! Shared building blocks for the techdigest pipeline.
//!
//! Holds everything that does not talk to the network: the YAML pipeline
//! configuration, environment settings, the per-run context, the template
//! resolver, the dated snapshot store, and the Markdown renderers.

pub mod app_config;
pub mod config;
pub mod context;
pub mod pipeline;
pub mod render;
pub mod snapshot;
pub mod template;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use context::{civil_date, RunContext};
pub use pipeline::{
    load_pipeline_config, parse_pipeline_config, DigestSettings, GithubSettings,
    PerplexitySettings, PipelineConfig, QueryConfig, SectionConfig, SummarySettings,
};
pub use render::{build_digest_markdown, build_summary_prompt, summary_footer, MISSING_ANSWER};
pub use snapshot::{
    RawSnapshot, SnapshotError, SnapshotStore, TopicQueryResult, TrendingItem, Usage,
};
pub use template::{bindings_from_context, resolve};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read config file {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    FileParse(#[from] serde_yaml::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
