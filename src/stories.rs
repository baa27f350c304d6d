//! # Stories
//! Aggregate pass: newest IDs -> concurrent item lookups -> story filter -> cache.
//!
//! A failing ID-list fetch aborts the pass; a failing item lookup only drops
//! that item.
//!
//! Output order is the completion order of the item lookups, so it is not
//! stable between passes.

use std::sync::Arc;
use std::time::Duration;

use metrics::{counter, histogram};
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{CacheOptions, StoryCache, STORIES_CACHE_KEY};
use crate::metrics as m;
use crate::model::{AggregateResult, Item};
use crate::upstream::{ItemSource, UpstreamError};

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("aggregation cancelled")]
    Cancelled,
}

/// Whether a result came from the cache or from a fresh pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSignal {
    Hit,
    Miss,
}

impl CacheSignal {
    pub fn as_header_value(self) -> &'static str {
        match self {
            CacheSignal::Hit => "HIT",
            CacheSignal::Miss => "MISS",
        }
    }
}

enum Pass {
    NoData,
    Stories(Vec<Item>),
}

pub struct StoryAggregator {
    source: Arc<dyn ItemSource>,
    cache: Arc<StoryCache>,
    ttl: Duration,
}

impl StoryAggregator {
    pub fn new(source: Arc<dyn ItemSource>, cache: Arc<StoryCache>, ttl: Duration) -> Self {
        Self { source, cache, ttl }
    }

    pub fn cache(&self) -> &Arc<StoryCache> {
        &self.cache
    }

    /// Newest stories, from the cache when possible.
    pub async fn get_stories(&self, cancel: &CancellationToken) -> AggregateResult {
        self.load(cancel).await.0
    }

    /// Same as [`get_stories`](Self::get_stories), also reporting whether the cache served it.
    pub async fn load(&self, cancel: &CancellationToken) -> (AggregateResult, CacheSignal) {
        if let Some(hit) = self.cache.try_get(STORIES_CACHE_KEY) {
            counter!(m::CACHE_HITS).increment(1);
            debug!("stories served from cache");
            return (hit, CacheSignal::Hit);
        }
        counter!(m::CACHE_MISSES).increment(1);

        let t0 = std::time::Instant::now();
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AggregateError::Cancelled),
            res = self.run_pass() => res,
        };
        histogram!(m::PASS_DURATION_MS).record(t0.elapsed().as_secs_f64() * 1_000.0);

        let result = match outcome {
            Ok(Pass::Stories(items)) => {
                counter!(m::STORIES_KEPT).increment(items.len() as u64);
                info!(stories = items.len(), source = self.source.name(), "aggregate pass done");
                let result = AggregateResult::stories(items);
                self.cache
                    .set(STORIES_CACHE_KEY, result.clone(), CacheOptions::ttl(self.ttl));
                result
            }
            Ok(Pass::NoData) => {
                info!("upstream returned no ids; clearing cache");
                self.cache.clear();
                AggregateResult::no_data()
            }
            Err(e) => {
                counter!(m::PASS_FAILURES).increment(1);
                warn!(error = %e, "aggregate pass failed");
                AggregateResult::failure(e.to_string())
            }
        };
        (result, CacheSignal::Miss)
    }

    async fn run_pass(&self) -> Result<Pass, AggregateError> {
        let ids = self.source.fetch_newest_ids().await?;
        if ids.is_empty() {
            return Ok(Pass::NoData);
        }

        // Dropping the set (e.g. on cancellation) aborts every lookup still in flight.
        let mut set = JoinSet::new();
        for id in ids.iter().copied() {
            let source = Arc::clone(&self.source);
            set.spawn(async move { (id, source.fetch_item(id).await) });
        }

        let mut stories = Vec::with_capacity(ids.len());
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((_, Ok(item))) if item.is_story() => stories.push(item),
                Ok((_, Ok(_))) => {}
                Ok((id, Err(e))) => {
                    counter!(m::ITEM_ERRORS).increment(1);
                    warn!(id, error = %e, "item lookup failed; dropping");
                }
                Err(e) => {
                    counter!(m::ITEM_ERRORS).increment(1);
                    warn!(error = %e, "item lookup task failed; dropping");
                }
            }
        }

        debug!(requested = ids.len(), kept = stories.len(), "filtered items");
        Ok(Pass::Stories(stories))
    }
}
