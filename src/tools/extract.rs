use super::ensure_success;
use crate::core::config::{RenderOptions, ScoutConfig};
use crate::core::error::{Upstream, UpstreamError};
use crate::AppState;
use async_trait::async_trait;
use serde::Serialize;
use tracing::info;
use url::Url;

/// Renders a page in a headless browser and returns its content as text.
#[async_trait]
pub trait ContentRenderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<String, UpstreamError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderRequest<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    wait_for: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    goto_options: Option<GotoOptions<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GotoOptions<'a> {
    wait_until: &'a str,
}

/// Browserless `/content` client. The token is a query parameter.
pub struct BrowserlessClient {
    http: reqwest::Client,
    endpoint: Url,
    render: RenderOptions,
}

impl BrowserlessClient {
    pub fn new(http: reqwest::Client, config: &ScoutConfig) -> Self {
        let mut endpoint = config.browserless_url.clone();
        endpoint
            .query_pairs_mut()
            .append_pair("token", &config.keys.browserless);
        Self {
            http,
            endpoint,
            render: config.render.clone(),
        }
    }
}

#[async_trait]
impl ContentRenderer for BrowserlessClient {
    async fn render(&self, url: &str) -> Result<String, UpstreamError> {
        info!("Browserless render: {}", url);

        let body = RenderRequest {
            url,
            wait_for: self.render.wait_for_ms,
            goto_options: self
                .render
                .wait_until
                .as_deref()
                .map(|wait_until| GotoOptions { wait_until }),
        };

        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamError::transport(Upstream::Browserless, e))?;

        let resp = ensure_success(Upstream::Browserless, resp).await?;
        resp.text()
            .await
            .map_err(|e| UpstreamError::decode(Upstream::Browserless, e))
    }
}

/// Fetch the rendered content of `url`, unchanged.
pub async fn extract_property_data(state: &AppState, url: &str) -> Result<String, UpstreamError> {
    let content = state.renderer.render(url).await?;
    info!("Extracted {} chars from {}", content.chars().count(), url);
    Ok(content)
}
