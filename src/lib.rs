// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod cache;
pub mod config;
pub mod metrics;
pub mod model;
pub mod stories;
pub mod upstream;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;

pub use crate::api::{router, AppState};
pub use crate::config::Config;

use crate::cache::StoryCache;
use crate::metrics::Metrics;
use crate::stories::StoryAggregator;
use crate::upstream::{HackerNewsClient, ItemSource};

/// Wire the aggregator, cache and metrics around `source` and return the shared state
/// together with the full router (including `/metrics` when `cfg.debug_routes` is set).
pub fn build_with_source(
    cfg: &Config,
    source: Arc<dyn ItemSource>,
) -> anyhow::Result<(AppState, Router)> {
    let ttl_ms = u64::try_from(cfg.cache_ttl.as_millis()).unwrap_or(u64::MAX);
    let metrics = Metrics::init(ttl_ms).context("installing prometheus recorder")?;

    let cache = Arc::new(StoryCache::new());
    let stories = Arc::new(StoryAggregator::new(source, cache, cfg.cache_ttl));
    let state = AppState::new(stories);

    let mut app = api::router(state.clone());
    if cfg.debug_routes {
        app = app.merge(metrics.router());
    }
    Ok((state, app))
}

/// Build the app against the real Hacker News API using `cfg`.
pub fn build(cfg: &Config) -> anyhow::Result<(AppState, Router)> {
    let client = HackerNewsClient::from_config(cfg).context("building upstream http client")?;
    tracing::info!(base_url = client.base_url(), ttl_secs = cfg.cache_ttl.as_secs(), "upstream configured");
    build_with_source(cfg, Arc::new(client))
}

/// Build the in-process router from environment configuration.
pub async fn app() -> anyhow::Result<Router> {
    let cfg = Config::from_env();
    Ok(build(&cfg)?.1)
}
