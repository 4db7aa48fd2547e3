use super::common::{pretty_json, required_str, text_or_error};
use crate::mcp::McpCallResponse;
use crate::types::HandlerResult;
use crate::{analyze, AppState};
use serde_json::Value;
use std::sync::Arc;

pub async fn handle(state: Arc<AppState>, arguments: &Value) -> HandlerResult<McpCallResponse> {
    let text = required_str(arguments, "text")?;

    let result = analyze::analyze_properties(&state, text)
        .await
        .map(|analysis| pretty_json(&analysis));

    Ok(text_or_error("analyze_properties", result))
}
