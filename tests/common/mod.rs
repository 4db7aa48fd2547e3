//! Local stand-ins for Serper, Browserless and Hugging Face.
#![allow(dead_code)]

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use property_scout::{ApiKeys, AppState, ScoutConfig};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use url::Url;

pub const SERPER_KEY: &str = "test-serper-key";
pub const BROWSERLESS_KEY: &str = "test-browserless-key";
pub const HUGGINGFACE_KEY: &str = "test-hf-key";

/// Characters of filler appended to every rendered page.
pub const PAGE_FILLER: usize = 2000;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub credential: Option<String>,
    pub body: Value,
}

/// Upstream behaviour plus everything the upstreams received.
#[derive(Clone)]
pub struct MockUpstream {
    pub search_status: StatusCode,
    pub render_status: StatusCode,
    pub classify_status: StatusCode,
    pub organic_count: usize,
    pub search_calls: Arc<Mutex<Vec<Recorded>>>,
    pub render_calls: Arc<Mutex<Vec<Recorded>>>,
    pub classify_calls: Arc<Mutex<Vec<Recorded>>>,
}

impl Default for MockUpstream {
    fn default() -> Self {
        Self {
            search_status: StatusCode::OK,
            render_status: StatusCode::OK,
            classify_status: StatusCode::OK,
            organic_count: 10,
            search_calls: Arc::default(),
            render_calls: Arc::default(),
            classify_calls: Arc::default(),
        }
    }
}

impl MockUpstream {
    pub fn search_payload(&self) -> Value {
        let organic: Vec<Value> = (1..=self.organic_count)
            .map(|i| {
                json!({
                    "title": format!("Listing {i}"),
                    "link": listing_url(i),
                    "position": i
                })
            })
            .collect();
        json!({
            "searchParameters": {"type": "search", "engine": "google"},
            "organic": organic
        })
    }

    pub fn total_calls(&self) -> usize {
        self.search_calls.lock().unwrap().len()
            + self.render_calls.lock().unwrap().len()
            + self.classify_calls.lock().unwrap().len()
    }

    /// Serve on an ephemeral port and return a state pointed at it.
    pub async fn start(self) -> (Arc<AppState>, MockUpstream) {
        let app = Router::new()
            .route("/search", post(serper))
            .route("/content", post(browserless))
            .route("/models/{*model}", post(huggingface))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let mut config = ScoutConfig::new(ApiKeys::new(SERPER_KEY, BROWSERLESS_KEY, HUGGINGFACE_KEY)).unwrap();
        config.serper_url = Url::parse(&format!("http://{addr}/search")).unwrap();
        config.browserless_url = Url::parse(&format!("http://{addr}/content")).unwrap();
        config.huggingface_url = Url::parse(&format!("http://{addr}/models/test-model")).unwrap();

        (Arc::new(AppState::new(config).unwrap()), self)
    }
}

/// State whose upstreams are unreachable; any outbound call fails fast.
pub fn unreachable_state() -> Arc<AppState> {
    let mut config = ScoutConfig::new(ApiKeys::new(SERPER_KEY, BROWSERLESS_KEY, HUGGINGFACE_KEY)).unwrap();
    config.serper_url = Url::parse("http://127.0.0.1:9/search").unwrap();
    config.browserless_url = Url::parse("http://127.0.0.1:9/content").unwrap();
    config.huggingface_url = Url::parse("http://127.0.0.1:9/models/test-model").unwrap();
    Arc::new(AppState::new(config).unwrap())
}

pub fn listing_url(i: usize) -> String {
    format!("https://www.zameen.example/property/{i}")
}

pub fn rendered_page(url: &str) -> String {
    format!("<html><body><h1>{url}</h1>{}</body></html>", "x".repeat(PAGE_FILLER))
}

async fn serper(
    State(mock): State<MockUpstream>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    mock.search_calls.lock().unwrap().push(Recorded {
        credential: header(&headers, "x-api-key"),
        body,
    });
    if !mock.search_status.is_success() {
        return (mock.search_status, Json(json!({"message": "Unauthorized."})));
    }
    (StatusCode::OK, Json(mock.search_payload()))
}

async fn browserless(
    State(mock): State<MockUpstream>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    let url = body["url"].as_str().unwrap_or_default().to_string();
    mock.render_calls.lock().unwrap().push(Recorded {
        credential: params.get("token").cloned(),
        body,
    });
    if !mock.render_status.is_success() {
        return (mock.render_status, "upstream browser crashed".to_string());
    }
    (StatusCode::OK, rendered_page(&url))
}

async fn huggingface(
    State(mock): State<MockUpstream>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    mock.classify_calls.lock().unwrap().push(Recorded {
        credential: header(&headers, "authorization"),
        body,
    });
    if !mock.classify_status.is_success() {
        return (
            mock.classify_status,
            Json(json!({"error": "Model is currently loading"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!([[
            {"label": "POSITIVE", "score": 0.9991},
            {"label": "NEGATIVE", "score": 0.0009}
        ]])),
    )
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
