//! External movie metadata: details/posters and the unknown-title fallback.
//!
//! The engine never sees this; handlers inject a provider through `AppState`
//! so the ranking core stays testable without network access.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub title: String,
    pub overview: String,
    pub genres: Vec<String>,
    pub poster_url: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum MetadataError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("metadata service returned status {status}: {body}")]
    Status { status: u16, body: String },
}

pub type MetadataResult<T> = Result<T, MetadataError>;

#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Details for the best match of `title`, or `None` when nothing matches.
    async fn lookup_details(&self, title: &str) -> MetadataResult<Option<MovieDetail>>;

    /// Titles the service itself considers similar to `title`, best first.
    async fn recommend_similar_externally(&self, title: &str, limit: usize) -> MetadataResult<Vec<String>>;

    fn name(&self) -> &'static str;
}

/// Provider used when no metadata service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetadataProvider;

#[async_trait::async_trait]
impl MetadataProvider for NoopMetadataProvider {
    async fn lookup_details(&self, _title: &str) -> MetadataResult<Option<MovieDetail>> {
        Ok(None)
    }

    async fn recommend_similar_externally(&self, _title: &str, _limit: usize) -> MetadataResult<Vec<String>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &'static str { "noop" }
}
