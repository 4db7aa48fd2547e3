use super::handlers;
use super::tooling::{tool_catalog, ANALYZE_PROPERTIES, EXTRACT_PROPERTY_DATA, SEARCH_PROPERTIES};
use crate::types::*;
use crate::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
pub struct McpTool {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpToolsResponse {
    pub tools: Vec<McpTool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpCallRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpCallResponse {
    pub content: Vec<McpContent>,
    pub is_error: bool,
}

impl McpCallResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![McpContent::text(text)],
            is_error: false,
        }
    }

    pub fn error_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![McpContent::text(text)],
            is_error: true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl McpContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: "text".to_string(),
            text: text.into(),
        }
    }
}

pub async fn list_tools() -> Json<McpToolsResponse> {
    let tools = tool_catalog()
        .into_iter()
        .map(|tool| McpTool {
            name: tool.name.to_string(),
            description: tool.description.to_string(),
            input_schema: tool.input_schema,
        })
        .collect();
    Json(McpToolsResponse { tools })
}

pub async fn call_tool(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> HandlerResult<McpCallResponse> {
    let request: McpCallRequest = serde_json::from_slice(&body)
        .map_err(|e| ErrorResponse::bad_request(format!("Invalid tool call: {}", e)))?;
    info!("MCP tool call: {} with args: {:?}", request.name, request.arguments);
    call_tool_inner(state, &request.name, &request.arguments).await
}

/// Dispatch by tool name. Unknown names are a 404 and never reach an upstream.
pub async fn call_tool_inner(
    state: Arc<AppState>,
    name: &str,
    arguments: &Value,
) -> HandlerResult<McpCallResponse> {
    match name {
        SEARCH_PROPERTIES => handlers::search_properties::handle(state, arguments).await,
        EXTRACT_PROPERTY_DATA => handlers::extract_property_data::handle(state, arguments).await,
        ANALYZE_PROPERTIES => handlers::analyze_properties::handle(state, arguments).await,
        _ => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Unknown tool: {}", name),
            }),
        )),
    }
}
