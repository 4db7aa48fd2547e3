use super::common::{required_str, text_or_error};
use crate::mcp::McpCallResponse;
use crate::types::HandlerResult;
use crate::{extract, AppState};
use serde_json::Value;
use std::sync::Arc;

pub async fn handle(state: Arc<AppState>, arguments: &Value) -> HandlerResult<McpCallResponse> {
    let url = required_str(arguments, "url")?;

    let result = extract::extract_property_data(&state, url).await;

    Ok(text_or_error("extract_property_data", result))
}
