use super::common::{pretty_json, required_str, text_or_error};
use crate::mcp::McpCallResponse;
use crate::types::HandlerResult;
use crate::{search, AppState};
use serde_json::Value;
use std::sync::Arc;

pub async fn handle(state: Arc<AppState>, arguments: &Value) -> HandlerResult<McpCallResponse> {
    let query = required_str(arguments, "query")?;

    let result = search::search_properties(&state, query, state.config.search_url_limit)
        .await
        .map(|outcome| pretty_json(&outcome.payload));

    Ok(text_or_error("search_properties", result))
}
