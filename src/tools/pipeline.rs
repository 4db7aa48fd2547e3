//! `find_house`: search, then render each top result, then classify each rendering.
//!
//! Strictly sequential. A failed search aborts the run; a failed render or
//! classification is recorded on that URL's entry and the run moves on.

use super::{analyze, extract, search};
use crate::core::error::UpstreamError;
use crate::AppState;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::{info, warn};

/// Result of one pipeline step for one URL.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome<T> {
    Done(T),
    Failed(UpstreamError),
    /// Not attempted because an earlier step for the same URL failed.
    Skipped,
}

impl<T> StepOutcome<T> {
    pub fn as_done(&self) -> Option<&T> {
        match self {
            StepOutcome::Done(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

impl<T> From<Result<T, UpstreamError>> for StepOutcome<T> {
    fn from(result: Result<T, UpstreamError>) -> Self {
        match result {
            Ok(value) => StepOutcome::Done(value),
            Err(err) => StepOutcome::Failed(err),
        }
    }
}

// On the wire a failure is its message and a skipped step is `null`.
impl<T: Serialize> Serialize for StepOutcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StepOutcome::Done(value) => value.serialize(serializer),
            StepOutcome::Failed(err) => serializer.serialize_str(&err.to_string()),
            StepOutcome::Skipped => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineEntry {
    pub url: String,
    pub content: StepOutcome<String>,
    pub analysis: StepOutcome<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    pub query: String,
    pub search_results: Value,
    pub extracted_data: Vec<PipelineEntry>,
}

/// First `max_chars` characters of `text` (whole text if shorter).
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub async fn find_house(state: &AppState, query: &str) -> Result<PipelineRun, UpstreamError> {
    let config = &state.config;
    info!("find_house: starting pipeline for {:?}", query);

    let search = search::search_properties(state, query, config.pipeline_url_limit).await?;

    let mut extracted_data = Vec::with_capacity(search.urls.len());
    for url in &search.urls {
        let content: StepOutcome<String> =
            extract::extract_property_data(state, url).await.into();

        let analysis: StepOutcome<Value> = match &content {
            StepOutcome::Done(text) => {
                let input = truncate_chars(text, config.analyze_max_chars);
                analyze::analyze_properties(state, input).await.into()
            }
            StepOutcome::Failed(err) => {
                warn!("find_house: extraction failed for {}: {}", url, err);
                StepOutcome::Skipped
            }
            StepOutcome::Skipped => StepOutcome::Skipped,
        };
        if let StepOutcome::Failed(err) = &analysis {
            warn!("find_house: analysis failed for {}: {}", url, err);
        }

        extracted_data.push(PipelineEntry {
            url: url.clone(),
            content,
            analysis,
        });
    }

    info!(
        "find_house: processed {} url(s) for {:?}",
        extracted_data.len(),
        query
    );

    Ok(PipelineRun {
        query: query.to_string(),
        search_results: search.payload,
        extracted_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Upstream;
    use crate::tools::analyze::TextClassifier;
    use crate::tools::extract::ContentRenderer;
    use crate::tools::search::SearchProvider;
    use crate::{ApiKeys, ScoutConfig};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    struct FixedSearch {
        payload: Result<Value, UpstreamError>,
    }

    #[async_trait]
    impl SearchProvider for FixedSearch {
        async fn search(&self, _query: &str, _num: u32) -> Result<Value, UpstreamError> {
            self.payload.clone()
        }
    }

    /// Renders `<url>` followed by 600 'x' characters; fails for URLs containing "broken".
    #[derive(Default)]
    struct LongPageRenderer {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ContentRenderer for LongPageRenderer {
        async fn render(&self, url: &str) -> Result<String, UpstreamError> {
            self.calls.lock().unwrap().push(url.to_string());
            if url.contains("broken") {
                return Err(UpstreamError::Status {
                    service: Upstream::Browserless,
                    status: 502,
                    body: "Bad Gateway".to_string(),
                });
            }
            Ok(format!("{}{}", url, "x".repeat(600)))
        }
    }

    #[derive(Default)]
    struct RecordingClassifier {
        inputs: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl TextClassifier for RecordingClassifier {
        async fn classify(&self, text: &str) -> Result<Value, UpstreamError> {
            self.inputs.lock().unwrap().push(text.to_string());
            if self.fail {
                return Err(UpstreamError::Transport {
                    service: Upstream::HuggingFace,
                    message: "connection refused".to_string(),
                });
            }
            Ok(json!([[{"label": "POSITIVE", "score": 0.98}]]))
        }
    }

    fn organic(links: &[&str]) -> Value {
        json!({
            "organic": links.iter().map(|l| json!({"link": l, "title": "listing"})).collect::<Vec<_>>()
        })
    }

    fn state_with(
        search: Result<Value, UpstreamError>,
        renderer: Arc<LongPageRenderer>,
        classifier: Arc<RecordingClassifier>,
    ) -> AppState {
        AppState::new(ScoutConfig::new(ApiKeys::new("s", "b", "h")).unwrap())
            .unwrap()
            .with_search_service(Arc::new(FixedSearch { payload: search }))
            .with_renderer(renderer)
            .with_classifier(classifier)
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("short", 512), "short");
        assert_eq!(truncate_chars("", 3), "");
        let long = "ü".repeat(600);
        assert_eq!(truncate_chars(&long, 512).chars().count(), 512);
    }

    #[tokio::test]
    async fn processes_top_three_in_search_order() {
        let renderer = Arc::new(LongPageRenderer::default());
        let classifier = Arc::new(RecordingClassifier::default());
        let payload = organic(&[
            "https://a.example/1",
            "https://b.example/2",
            "https://c.example/3",
            "https://d.example/4",
            "https://e.example/5",
        ]);
        let state = state_with(Ok(payload.clone()), renderer.clone(), classifier.clone());

        let run = find_house(&state, "5 marla lahore").await.unwrap();

        assert_eq!(run.query, "5 marla lahore");
        assert_eq!(run.search_results, payload);
        let urls: Vec<&str> = run.extracted_data.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(
            urls,
            ["https://a.example/1", "https://b.example/2", "https://c.example/3"]
        );
        assert_eq!(*renderer.calls.lock().unwrap(), urls);

        for entry in &run.extracted_data {
            let expected = format!("{}{}", entry.url, "x".repeat(600));
            assert_eq!(entry.content.as_done(), Some(&expected));
            assert!(entry.analysis.as_done().is_some());
        }
    }

    #[tokio::test]
    async fn classifier_input_is_capped() {
        let renderer = Arc::new(LongPageRenderer::default());
        let classifier = Arc::new(RecordingClassifier::default());
        let state = state_with(
            Ok(organic(&["https://a.example/1", "https://b.example/2"])),
            renderer,
            classifier.clone(),
        );

        let run = find_house(&state, "q").await.unwrap();

        let inputs = classifier.inputs.lock().unwrap();
        assert_eq!(inputs.len(), 2);
        for (input, entry) in inputs.iter().zip(&run.extracted_data) {
            assert_eq!(input.chars().count(), 512);
            assert!(entry.content.as_done().unwrap().starts_with(input.as_str()));
        }
    }

    #[tokio::test]
    async fn failed_extraction_is_recorded_and_run_continues() {
        let renderer = Arc::new(LongPageRenderer::default());
        let classifier = Arc::new(RecordingClassifier::default());
        let state = state_with(
            Ok(organic(&[
                "https://a.example/1",
                "https://broken.example/2",
                "https://c.example/3",
            ])),
            renderer.clone(),
            classifier.clone(),
        );

        let run = find_house(&state, "q").await.unwrap();

        assert_eq!(run.extracted_data.len(), 3);
        let broken = &run.extracted_data[1];
        assert!(broken.content.is_failed());
        assert_eq!(broken.analysis, StepOutcome::Skipped);
        assert_eq!(renderer.calls.lock().unwrap().len(), 3);
        assert_eq!(classifier.inputs.lock().unwrap().len(), 2);

        let wire = serde_json::to_value(broken).unwrap();
        assert_eq!(
            wire,
            json!({
                "url": "https://broken.example/2",
                "content": "Browserless API error: HTTP 502: Bad Gateway",
                "analysis": null
            })
        );
    }

    #[tokio::test]
    async fn failed_analysis_keeps_content() {
        let renderer = Arc::new(LongPageRenderer::default());
        let classifier = Arc::new(RecordingClassifier {
            fail: true,
            ..Default::default()
        });
        let state = state_with(Ok(organic(&["https://a.example/1"])), renderer, classifier);

        let run = find_house(&state, "q").await.unwrap();

        let entry = &run.extracted_data[0];
        assert!(entry.content.as_done().is_some());
        assert!(entry.analysis.is_failed());
        let wire = serde_json::to_value(entry).unwrap();
        assert_eq!(
            wire["analysis"],
            json!("Hugging Face API error: connection refused")
        );
    }

    #[tokio::test]
    async fn search_failure_aborts_before_extraction() {
        let renderer = Arc::new(LongPageRenderer::default());
        let classifier = Arc::new(RecordingClassifier::default());
        let state = state_with(
            Err(UpstreamError::Status {
                service: Upstream::Serper,
                status: 403,
                body: "{\"message\":\"Unauthorized\"}".to_string(),
            }),
            renderer.clone(),
            classifier.clone(),
        );

        let err = find_house(&state, "q").await.unwrap_err();

        assert_eq!(err.status(), Some(403));
        assert!(renderer.calls.lock().unwrap().is_empty());
        assert!(classifier.inputs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn no_organic_results_means_no_entries() {
        let renderer = Arc::new(LongPageRenderer::default());
        let classifier = Arc::new(RecordingClassifier::default());
        let state = state_with(Ok(json!({"searchParameters": {}})), renderer, classifier);

        let run = find_house(&state, "q").await.unwrap();
        assert!(run.extracted_data.is_empty());
    }
}
