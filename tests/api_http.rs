// tests/api_http.rs
//
// HTTP-level tests for the public Router without opening sockets.
// The upstream is replaced by an in-memory ItemSource; the router is
// exercised directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /api/hackernews success body shape
// - no-data and failure are still HTTP 200 (status lives in the body)
// - JSON content type, CORS, unknown routes

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use hn_stories::model::Item;
use hn_stories::upstream::{ItemSource, UpstreamError};
use hn_stories::Config;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

/// Fixed upstream: `ids == None` makes the ID-list fetch fail.
struct FixedSource {
    ids: Option<Vec<u64>>,
    items: HashMap<u64, Json>,
}

#[async_trait::async_trait]
impl ItemSource for FixedSource {
    async fn fetch_newest_ids(&self) -> Result<Vec<u64>, UpstreamError> {
        match &self.ids {
            Some(ids) => Ok(ids.clone()),
            None => Err(UpstreamError::NotFound(0)),
        }
    }

    async fn fetch_item(&self, id: u64) -> Result<Item, UpstreamError> {
        let raw = self.items.get(&id).ok_or(UpstreamError::NotFound(id))?;
        Ok(serde_json::from_value(raw.clone())?)
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

fn test_router(ids: Option<Vec<u64>>, items: Vec<Json>) -> Router {
    let items = items
        .into_iter()
        .map(|v| (v["id"].as_u64().expect("fixture id"), v))
        .collect();
    let source = Arc::new(FixedSource { ids, items });
    hn_stories::build_with_source(&Config::default(), source)
        .expect("build router")
        .1
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, header::HeaderMap, Json) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build GET");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let v: Json = serde_json::from_slice(&bytes).expect("parse json");
    (status, headers, v)
}

#[tokio::test]
async fn stories_returns_only_linked_stories() {
    let app = test_router(
        Some(vec![1, 2]),
        vec![
            serde_json::json!({ "id": 1, "type": "story", "title": "A", "url": "http://a" }),
            serde_json::json!({ "id": 2, "type": "comment", "text": "hi" }),
        ],
    );

    let (status, headers, v) = get_json(app, "/api/hackernews").await;
    assert_eq!(status, StatusCode::OK);
    let ct = headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");
    assert!(ct.starts_with("application/json"), "content-type was '{ct}'");

    assert_eq!(v["statusCode"], 200);
    assert!(v["errorMessage"].is_null());
    let data = v["data"].as_array().expect("data must be an array");
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], 1);
    assert_eq!(data[0]["type"], "story");
    assert_eq!(data[0]["url"], "http://a");
}

#[tokio::test]
async fn empty_id_list_is_http_200_with_no_data_marker() {
    let app = test_router(Some(vec![]), vec![]);

    let (status, _, v) = get_json(app, "/api/hackernews").await;
    assert_eq!(status, StatusCode::OK, "no-data must not change the HTTP status");
    assert_eq!(v["statusCode"], 204);
    assert!(v["data"].is_null());
    assert!(v["errorMessage"].is_null());
}

#[tokio::test]
async fn id_list_failure_is_http_200_with_failure_marker() {
    let app = test_router(None, vec![]);

    let (status, _, v) = get_json(app, "/api/hackernews").await;
    assert_eq!(status, StatusCode::OK, "failure must not change the HTTP status");
    assert_eq!(v["statusCode"], 500);
    assert!(v["data"].is_null());
    let msg = v["errorMessage"].as_str().expect("errorMessage must be a string");
    assert!(!msg.is_empty());
}

#[tokio::test]
async fn every_returned_item_is_a_story_with_url() {
    let items = vec![
        serde_json::json!({ "id": 10, "type": "story", "url": "http://x" }),
        serde_json::json!({ "id": 11, "type": "job", "url": "http://jobs" }),
        serde_json::json!({ "id": 12, "type": "story" }),
        serde_json::json!({ "id": 13, "type": "story", "url": "" }),
        serde_json::json!({ "id": 14, "type": "STORY", "url": "http://y" }),
        serde_json::json!({ "id": 15, "type": "poll" }),
    ];
    // 16 has no record upstream and must be dropped without failing the pass.
    let app = test_router(Some(vec![10, 11, 12, 13, 14, 15, 16]), items);

    let (_, _, v) = get_json(app, "/api/hackernews").await;
    assert_eq!(v["statusCode"], 200);
    let data = v["data"].as_array().unwrap();
    let mut ids: Vec<u64> = data.iter().map(|i| i["id"].as_u64().unwrap()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![10, 14]);
    for it in data {
        assert!(it["type"].as_str().unwrap().eq_ignore_ascii_case("story"));
        assert!(!it["url"].as_str().unwrap().trim().is_empty());
    }
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = test_router(Some(vec![]), vec![]);
    let req = Request::builder()
        .method("GET")
        .uri("/api/hackernews")
        .header(header::ORIGIN, "http://example.test")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        "CORS header missing"
    );
}

#[tokio::test]
async fn other_routes_are_not_mounted() {
    let app = test_router(Some(vec![]), vec![]);
    for uri in ["/", "/health", "/metrics", "/api/hackernews/1"] {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri} should be 404");
    }
}
