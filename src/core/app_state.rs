use super::config::ScoutConfig;
use crate::tools::analyze::{HuggingFaceClient, TextClassifier};
use crate::tools::extract::{BrowserlessClient, ContentRenderer};
use crate::tools::search::{SearchProvider, SerperClient};
use std::sync::Arc;

/// Everything a request needs, shared read-only across requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ScoutConfig>,
    pub search_service: Arc<dyn SearchProvider>,
    pub renderer: Arc<dyn ContentRenderer>,
    pub classifier: Arc<dyn TextClassifier>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build the shared HTTP client and the Serper / Browserless / Hugging Face clients.
    pub fn new(config: ScoutConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        let search_service: Arc<dyn SearchProvider> =
            Arc::new(SerperClient::new(http_client.clone(), &config));
        let renderer: Arc<dyn ContentRenderer> =
            Arc::new(BrowserlessClient::new(http_client.clone(), &config));
        let classifier: Arc<dyn TextClassifier> =
            Arc::new(HuggingFaceClient::new(http_client, &config));

        Ok(Self {
            config: Arc::new(config),
            search_service,
            renderer,
            classifier,
        })
    }

    pub fn with_search_service(mut self, search_service: Arc<dyn SearchProvider>) -> Self {
        self.search_service = search_service;
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn ContentRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn TextClassifier>) -> Self {
        self.classifier = classifier;
        self
    }
}
