use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderName, HeaderValue},
    routing::get,
    Json, Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use crate::model::AggregateResult;
use crate::stories::StoryAggregator;

pub const STORIES_ROUTE: &str = "/api/hackernews";
pub const CACHE_HEADER: &str = "x-stories-cache";

#[derive(Clone)]
pub struct AppState {
    pub stories: Arc<StoryAggregator>,
    /// Cancelled on shutdown; each request runs under a child token.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(stories: Arc<StoryAggregator>) -> Self {
        Self {
            stories,
            shutdown: CancellationToken::new(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(STORIES_ROUTE, get(get_stories))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Always 200: failure and no-data are reported in the body's `statusCode`.
async fn get_stories(
    State(state): State<AppState>,
) -> ([(HeaderName, HeaderValue); 1], Json<AggregateResult>) {
    let cancel = state.shutdown.child_token();
    let (result, signal) = state.stories.load(&cancel).await;
    tracing::info!(
        status = result.status_code(),
        cache = signal.as_header_value(),
        "stories request served"
    );
    (
        [(
            HeaderName::from_static(CACHE_HEADER),
            HeaderValue::from_static(signal.as_header_value()),
        )],
        Json(result),
    )
}
