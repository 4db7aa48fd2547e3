use std::fmt;
use thiserror::Error;

/// Longest upstream body excerpt carried into an error message.
const BODY_PREVIEW_CHARS: usize = 300;

/// The three external services this crate talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upstream {
    Serper,
    Browserless,
    HuggingFace,
}

impl Upstream {
    pub fn label(self) -> &'static str {
        match self {
            Upstream::Serper => "Serper",
            Upstream::Browserless => "Browserless",
            Upstream::HuggingFace => "Hugging Face",
        }
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failure of a single outbound call.
///
/// `Status` means the service answered and said no; `Transport` means it could not
/// be reached at all; `Decode` means it answered 2xx with a body we could not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    #[error("{service} API error: HTTP {status}: {}", preview(.body))]
    Status {
        service: Upstream,
        status: u16,
        body: String,
    },
    #[error("{service} API error: {message}")]
    Transport { service: Upstream, message: String },
    #[error("{service} API error: invalid response body: {message}")]
    Decode { service: Upstream, message: String },
}

impl UpstreamError {
    pub fn transport(service: Upstream, err: reqwest::Error) -> Self {
        UpstreamError::Transport {
            service,
            message: redacted_message(err),
        }
    }

    pub fn decode(service: Upstream, err: reqwest::Error) -> Self {
        UpstreamError::Decode {
            service,
            message: redacted_message(err),
        }
    }

    pub fn service(&self) -> Upstream {
        match self {
            UpstreamError::Status { service, .. }
            | UpstreamError::Transport { service, .. }
            | UpstreamError::Decode { service, .. } => *service,
        }
    }

    /// HTTP status returned by the upstream, when it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error text without the request URL; the Browserless token rides in its query.
/// Causes are appended since dropping the URL leaves only a generic summary.
fn redacted_message(err: reqwest::Error) -> String {
    let err = err.without_url();
    let mut message = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn preview(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "<empty body>".to_string();
    }
    match body.char_indices().nth(BODY_PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}

/// Startup configuration problems. Fatal: the binaries refuse to start.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
    #[error("invalid URL for {var}: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
}
