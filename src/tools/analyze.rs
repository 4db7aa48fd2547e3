use super::ensure_success;
use crate::core::config::ScoutConfig;
use crate::core::error::{Upstream, UpstreamError};
use crate::AppState;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;
use url::Url;

/// A hosted text-classification model. The payload shape belongs to the model.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Value, UpstreamError>;
}

/// Hugging Face inference client (bearer auth).
pub struct HuggingFaceClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl HuggingFaceClient {
    pub fn new(http: reqwest::Client, config: &ScoutConfig) -> Self {
        Self {
            http,
            endpoint: config.huggingface_url.clone(),
            api_key: config.keys.huggingface.clone(),
        }
    }
}

#[async_trait]
impl TextClassifier for HuggingFaceClient {
    async fn classify(&self, text: &str) -> Result<Value, UpstreamError> {
        info!(
            "Hugging Face classify: {} chars via {}",
            text.chars().count(),
            self.endpoint.path()
        );

        let resp = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&json!({ "inputs": text }))
            .send()
            .await
            .map_err(|e| UpstreamError::transport(Upstream::HuggingFace, e))?;

        let resp = ensure_success(Upstream::HuggingFace, resp).await?;
        resp.json::<Value>()
            .await
            .map_err(|e| UpstreamError::decode(Upstream::HuggingFace, e))
    }
}

/// Classify `text` as given. Callers truncate beforehand if they need to.
pub async fn analyze_properties(state: &AppState, text: &str) -> Result<Value, UpstreamError> {
    state.classifier.classify(text).await
}
