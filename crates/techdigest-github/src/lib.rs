//! GitHub repository search and star-velocity ranking for the trending stage.

pub mod client;
pub mod error;
pub mod trending;
pub mod types;

pub use client::GithubClient;
pub use error::GithubError;
pub use trending::{
    build_search_query, days_old, fetch_trending, rank_trending, star_velocity, MIN_AGE_DAYS,
};
pub use types::{RepoSearchItem, RepoSearchResponse, SearchParams};
