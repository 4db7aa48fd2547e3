use crate::config::DEFAULT_QUERY;
use crate::pipeline::{self, PipelineRun};
use crate::types::*;
use crate::{analyze, extract, mcp, search, AppState};
use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

const INDEX_HTML: &str = include_str!("../static/index.html");

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health_check))
        .route("/search", post(search_handler))
        .route("/extract", post(extract_handler))
        .route("/analyze", post(analyze_handler))
        .route("/find_house", get(find_house_handler))
        .route("/mcp/tools", get(mcp::list_tools))
        .route("/mcp/call", post(mcp::call_tool))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Bodies are parsed leniently: a missing or malformed body behaves like `{}`,
// so the required-field check produces the 400.
fn json_body(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_check() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "property-scout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> HandlerResult<SearchResponse> {
    let args = json_body(&body);
    let query = str_arg(&args, "query").unwrap_or(DEFAULT_QUERY);

    match search::search_properties(&state, query, state.config.search_url_limit).await {
        Ok(outcome) => Ok(Json(SearchResponse {
            search_results: outcome.payload,
            urls: outcome.urls,
        })),
        Err(e) => {
            error!("Search error: {}", e);
            Err(ErrorResponse::upstream(&e))
        }
    }
}

async fn extract_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> HandlerResult<ExtractResponse> {
    let args = json_body(&body);
    let url = str_arg(&args, "url").ok_or_else(|| ErrorResponse::bad_request("URL required"))?;

    match extract::extract_property_data(&state, url).await {
        Ok(content) => Ok(Json(ExtractResponse { content })),
        Err(e) => {
            error!("Extract error for {}: {}", url, e);
            Err(ErrorResponse::upstream(&e))
        }
    }
}

async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> HandlerResult<AnalyzeResponse> {
    let args = json_body(&body);
    let text = str_arg(&args, "text").ok_or_else(|| ErrorResponse::bad_request("Text required"))?;

    match analyze::analyze_properties(&state, text).await {
        Ok(analysis) => Ok(Json(AnalyzeResponse { analysis })),
        Err(e) => {
            error!("Analyze error: {}", e);
            Err(ErrorResponse::upstream(&e))
        }
    }
}

async fn find_house_handler(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> HandlerResult<PipelineRun> {
    let query = query_param(raw.as_deref(), "query");
    let query = query.as_deref().unwrap_or(DEFAULT_QUERY);
    info!("Processing find_house request: {}", query);

    pipeline::find_house(&state, query).await.map(Json).map_err(|e| {
        error!("find_house search failed: {}", e);
        ErrorResponse::upstream(&e)
    })
}

// First non-blank value of `key`; repeated or unknown parameters are ignored.
fn query_param(raw: Option<&str>, key: &str) -> Option<String> {
    url::form_urlencoded::parse(raw?.as_bytes())
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.trim().to_string())
        .find(|v| !v.is_empty())
}
