use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub const CACHE_HITS: &str = "stories_cache_hits_total";
pub const CACHE_MISSES: &str = "stories_cache_misses_total";
pub const ITEM_ERRORS: &str = "stories_item_errors_total";
pub const PASS_FAILURES: &str = "stories_pass_failures_total";
pub const STORIES_KEPT: &str = "stories_kept_total";
pub const PASS_DURATION_MS: &str = "stories_pass_duration_ms";
pub const CACHE_TTL_MS: &str = "stories_cache_ttl_ms";

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Clone)]
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder (once per process) and publish the cache TTL gauge.
    pub fn init(ttl_ms: u64) -> anyhow::Result<Self> {
        let handle = HANDLE
            .get_or_try_init(|| {
                let handle = PrometheusBuilder::new().install_recorder()?;
                describe();
                Ok::<_, anyhow::Error>(handle)
            })?
            .clone();

        gauge!(CACHE_TTL_MS).set(ttl_ms as f64);

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router<S>(&self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

fn describe() {
    describe_counter!(CACHE_HITS, "Story requests served from the cache.");
    describe_counter!(CACHE_MISSES, "Story requests that triggered an aggregate pass.");
    describe_counter!(ITEM_ERRORS, "Item lookups dropped due to upstream errors.");
    describe_counter!(PASS_FAILURES, "Aggregate passes that ended in failure.");
    describe_counter!(STORIES_KEPT, "Stories kept after filtering.");
    describe_histogram!(PASS_DURATION_MS, "Aggregate pass duration in milliseconds.");
    describe_gauge!(CACHE_TTL_MS, "Configured story cache TTL in milliseconds.");
}
