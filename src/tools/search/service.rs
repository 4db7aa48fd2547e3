use crate::core::error::UpstreamError;
use async_trait::async_trait;
use serde_json::Value;

/// A web search backend returning its payload verbatim.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, num: u32) -> Result<Value, UpstreamError>;
}
