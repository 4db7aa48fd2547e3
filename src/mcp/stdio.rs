use super::tooling::{is_known_tool, schema_to_object_map, tool_catalog};
use crate::mcp::{call_tool_inner, McpCallResponse};
use crate::types::ErrorResponse;
use crate::{AppState, ScoutConfig};
use anyhow::Context;
use axum::http::StatusCode;
use axum::response::Json;
use rmcp::{model::*, ServiceExt};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

fn status_code_to_error_code(status: StatusCode) -> ErrorCode {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorCode::INVALID_PARAMS,
        StatusCode::NOT_FOUND => ErrorCode::METHOD_NOT_FOUND,
        _ => ErrorCode::INTERNAL_ERROR,
    }
}

fn mcp_call_response_to_stdio_result(response: McpCallResponse) -> CallToolResult {
    let content = response
        .content
        .into_iter()
        .map(|item| Content::text(item.text))
        .collect();

    if response.is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

fn convert_http_handler_result(
    result: Result<Json<McpCallResponse>, (StatusCode, Json<ErrorResponse>)>,
) -> Result<CallToolResult, ErrorData> {
    match result {
        Ok(Json(response)) => Ok(mcp_call_response_to_stdio_result(response)),
        Err((status, Json(err))) => Err(ErrorData::new(
            status_code_to_error_code(status),
            err.error,
            None,
        )),
    }
}

/// Resolve and run one tool call.
///
/// Unknown names fail with METHOD_NOT_FOUND and a missing arguments object or
/// required argument with INVALID_PARAMS; neither reaches an upstream service.
pub async fn dispatch(
    state: Arc<AppState>,
    name: &str,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, ErrorData> {
    if !is_known_tool(name) {
        return Err(ErrorData::new(
            ErrorCode::METHOD_NOT_FOUND,
            format!("Unknown tool: {}", name),
            None,
        ));
    }

    let args = arguments.map(Value::Object).ok_or_else(|| {
        ErrorData::new(
            ErrorCode::INVALID_PARAMS,
            "Missing required arguments object",
            None,
        )
    })?;

    convert_http_handler_result(call_tool_inner(state, name, &args).await)
}

#[derive(Clone, Debug)]
pub struct McpService {
    pub state: Arc<AppState>,
}

impl McpService {
    /// Load `.env` and the environment; refuses to start without all three API keys.
    pub fn from_env() -> anyhow::Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            info!("Loaded environment from {}", path.display());
        }
        let config = ScoutConfig::from_env().context("property-scout-mcp configuration")?;
        let state = AppState::new(config)?;
        Ok(Self::with_state(Arc::new(state)))
    }

    pub fn with_state(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

impl rmcp::ServerHandler for McpService {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.protocol_version = ProtocolVersion::LATEST;
        info.server_info = Implementation::from_build_env();
        info.instructions = Some(
            "Search for real-estate listings, extract listing page content, and score text sentiment."
                .to_string(),
        );
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info
    }

    async fn list_tools(
        &self,
        _page: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        let tools = tool_catalog()
            .into_iter()
            .map(|entry| {
                let mut tool = Tool::new(
                    entry.name,
                    entry.description,
                    schema_to_object_map(&entry.input_schema),
                );
                tool.title = Some(entry.title.to_string());
                tool
            })
            .collect();

        Ok(ListToolsResult {
            tools,
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        info!(
            "MCP tool call: {} with args: {:?}",
            request.name, request.arguments
        );
        dispatch(Arc::clone(&self.state), request.name.as_ref(), request.arguments).await
    }
}

pub async fn run() -> anyhow::Result<()> {
    let service = McpService::from_env()?;
    let running = service.serve(rmcp::transport::stdio()).await?;
    info!("MCP stdio server initialized; waiting for client session");
    let quit_reason = running.waiting().await?;
    warn!("MCP stdio server stopped: {:?}", quit_reason);
    Ok(())
}
