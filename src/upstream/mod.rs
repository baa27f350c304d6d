// src/upstream/mod.rs
pub mod hacker_news;

use thiserror::Error;

use crate::model::Item;

pub use hacker_news::HackerNewsClient;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream returned malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("item {0} not found upstream")]
    NotFound(u64),
}

/// Source of item IDs and item records. One request per call, no retries.
#[async_trait::async_trait]
pub trait ItemSource: Send + Sync {
    async fn fetch_newest_ids(&self) -> Result<Vec<u64>, UpstreamError>;
    async fn fetch_item(&self, id: u64) -> Result<Item, UpstreamError>;
    fn name(&self) -> &'static str;
}
