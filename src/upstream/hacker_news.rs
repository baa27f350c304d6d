// src/upstream/hacker_news.rs
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::model::Item;
use crate::upstream::{ItemSource, UpstreamError};

const USER_AGENT: &str = concat!("hn-stories/", env!("CARGO_PKG_VERSION"));

/// Client for the Hacker News Firebase v0 API.
#[derive(Clone)]
pub struct HackerNewsClient {
    http: reqwest::Client,
    base_url: String,
    id_limit: u32,
}

impl HackerNewsClient {
    pub fn new(base_url: &str, id_limit: u32, timeout: Duration) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(4).min(timeout))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            id_limit,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, UpstreamError> {
        Self::new(&cfg.base_url, cfg.id_limit, cfg.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send `req` and decode the body. Non-2xx is a transport error; the body is
    /// decoded separately so malformed JSON is reported as `Decode`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, UpstreamError> {
        let resp = req.send().await?.error_for_status()?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl ItemSource for HackerNewsClient {
    async fn fetch_newest_ids(&self) -> Result<Vec<u64>, UpstreamError> {
        let limit = self.id_limit.to_string();
        let req = self
            .http
            .get(format!("{}/v0/newstories.json", self.base_url))
            .query(&[("orderBy", "\"$priority\""), ("limitToFirst", limit.as_str())]);
        let ids: Vec<u64> = self.get_json(req).await?;
        tracing::debug!(count = ids.len(), "fetched newest ids");
        Ok(ids)
    }

    async fn fetch_item(&self, id: u64) -> Result<Item, UpstreamError> {
        let req = self
            .http
            .get(format!("{}/v0/item/{}.json", self.base_url, id));
        // Unknown ids come back as a literal `null`.
        let item: Option<Item> = self.get_json(req).await?;
        item.ok_or(UpstreamError::NotFound(id))
    }

    fn name(&self) -> &'static str {
        "hacker-news"
    }
}
