use crate::mcp::McpCallResponse;
use crate::types::{str_arg, ErrorResponse};
use crate::UpstreamError;
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::Value;
use tracing::warn;

pub fn required_str<'a>(
    arguments: &'a Value,
    key: &str,
) -> Result<&'a str, (StatusCode, Json<ErrorResponse>)> {
    str_arg(arguments, key)
        .ok_or_else(|| ErrorResponse::bad_request(format!("Missing {} parameter", key)))
}

/// Upstream failures are reported inside the tool result, not as protocol errors.
pub fn text_or_error(tool: &str, result: Result<String, UpstreamError>) -> Json<McpCallResponse> {
    match result {
        Ok(text) => Json(McpCallResponse::text(text)),
        Err(e) => {
            warn!("{} failed: {}", tool, e);
            Json(McpCallResponse::error_text(e.to_string()))
        }
    }
}

pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
