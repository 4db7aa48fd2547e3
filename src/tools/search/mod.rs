mod service;

use super::ensure_success;
use crate::core::config::ScoutConfig;
use crate::core::error::{Upstream, UpstreamError};
use crate::AppState;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;
use url::Url;

pub use service::SearchProvider;

/// Search payload plus the listing URLs derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub payload: Value,
    pub urls: Vec<String>,
}

/// Serper (Google search) client. The API key travels in `X-API-KEY`.
pub struct SerperClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl SerperClient {
    pub fn new(http: reqwest::Client, config: &ScoutConfig) -> Self {
        Self {
            http,
            endpoint: config.serper_url.clone(),
            api_key: config.keys.serper.clone(),
        }
    }
}

#[async_trait]
impl SearchProvider for SerperClient {
    async fn search(&self, query: &str, num: u32) -> Result<Value, UpstreamError> {
        info!("Serper search: {:?} (num={})", query, num);

        let resp = self
            .http
            .post(self.endpoint.clone())
            .header("X-API-KEY", &self.api_key)
            .json(&json!({ "q": query, "num": num }))
            .send()
            .await
            .map_err(|e| UpstreamError::transport(Upstream::Serper, e))?;

        let resp = ensure_success(Upstream::Serper, resp).await?;
        resp.json::<Value>()
            .await
            .map_err(|e| UpstreamError::decode(Upstream::Serper, e))
    }
}

/// Up to `limit` links from `organic[]`, in API order.
///
/// The first `limit` entries are considered; any of them without a string `link`
/// is skipped rather than replaced, so the result may be shorter than `limit`.
pub fn top_links(payload: &Value, limit: usize) -> Vec<String> {
    payload
        .get("organic")
        .and_then(Value::as_array)
        .map(|organic| {
            organic
                .iter()
                .take(limit)
                .filter_map(|item| item.get("link").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Run one search and derive up to `url_limit` listing URLs.
pub async fn search_properties(
    state: &AppState,
    query: &str,
    url_limit: usize,
) -> Result<SearchOutcome, UpstreamError> {
    let payload = state
        .search_service
        .search(query, state.config.search_num)
        .await?;
    let urls = top_links(&payload, url_limit);
    info!("Search for {:?} yielded {} url(s)", query, urls.len());
    Ok(SearchOutcome { payload, urls })
}
