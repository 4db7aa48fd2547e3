use super::error::ConfigError;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

// ---------------------------------------------------------------------------
// ScoutFileConfig: optional file-based tuning (property-scout.json)
// ---------------------------------------------------------------------------

/// Tuning knobs that may live in `property-scout.json`.
///
/// Every field is optional; environment variables win over the file and built-in
/// defaults apply last. Credentials are never read from the file.
#[derive(serde::Deserialize, Default, Clone, Debug)]
pub struct ScoutFileConfig {
    pub serper_api_url: Option<String>,
    pub browserless_api_url: Option<String>,
    pub huggingface_api_url: Option<String>,
    pub huggingface_model: Option<String>,
    /// Results requested from the search API per call. Default: 10.
    pub search_num: Option<u32>,
    /// URLs returned by the standalone search endpoint / tool. Default: 5.
    pub search_url_limit: Option<usize>,
    /// URLs processed by `find_house`. Default: 3.
    pub pipeline_url_limit: Option<usize>,
    /// Characters of extracted content fed to the classifier. Default: 512.
    pub analyze_max_chars: Option<usize>,
    /// Browserless `waitFor` in milliseconds; `0` disables. Default: 2000.
    pub render_wait_for_ms: Option<u64>,
    /// Browserless `gotoOptions.waitUntil`; empty disables. Default: `networkidle0`.
    pub render_wait_until: Option<String>,
    pub http_timeout_secs: Option<u64>,
    pub http_connect_timeout_secs: Option<u64>,
}

/// Load `property-scout.json` from standard locations.
///
/// Search order (first found wins):
/// 1. `PROPERTY_SCOUT_CONFIG` env var path
/// 2. `./property-scout.json`
///
/// Missing file → defaults. Parse error → warning, defaults.
pub fn load_file_config() -> ScoutFileConfig {
    let mut candidates = vec![std::path::PathBuf::from("property-scout.json")];
    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        candidates.insert(0, std::path::PathBuf::from(env_path));
    }

    for path in &candidates {
        let Ok(contents) = std::fs::read_to_string(path) else {
            continue;
        };
        match serde_json::from_str::<ScoutFileConfig>(&contents) {
            Ok(cfg) => {
                tracing::info!("property-scout.json loaded from {}", path.display());
                return cfg;
            }
            Err(e) => {
                tracing::warn!(
                    "property-scout.json parse error at {}: {}; using defaults",
                    path.display(),
                    e
                );
                return ScoutFileConfig::default();
            }
        }
    }

    ScoutFileConfig::default()
}

// ---------------------------------------------------------------------------

pub const ENV_CONFIG_PATH: &str = "PROPERTY_SCOUT_CONFIG";
pub const ENV_SERPER_API_KEY: &str = "SERPER_API_KEY";
pub const ENV_BROWSERLESS_API_KEY: &str = "BROWSERLESS_API_KEY";
pub const ENV_HUGGINGFACE_API_KEY: &str = "HUGGINGFACE_API_KEY";
pub const ENV_SERPER_API_URL: &str = "SERPER_API_URL";
pub const ENV_BROWSERLESS_API_URL: &str = "BROWSERLESS_API_URL";
pub const ENV_HUGGINGFACE_API_URL: &str = "HUGGINGFACE_API_URL";
pub const ENV_HUGGINGFACE_MODEL: &str = "HUGGINGFACE_MODEL";
pub const ENV_SEARCH_NUM: &str = "SEARCH_NUM";
pub const ENV_SEARCH_URL_LIMIT: &str = "SEARCH_URL_LIMIT";
pub const ENV_PIPELINE_URL_LIMIT: &str = "PIPELINE_URL_LIMIT";
pub const ENV_ANALYZE_MAX_CHARS: &str = "ANALYZE_MAX_CHARS";
pub const ENV_RENDER_WAIT_FOR_MS: &str = "RENDER_WAIT_FOR_MS";
pub const ENV_RENDER_WAIT_UNTIL: &str = "RENDER_WAIT_UNTIL";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";
pub const ENV_HTTP_CONNECT_TIMEOUT_SECS: &str = "HTTP_CONNECT_TIMEOUT_SECS";

/// Query used when `/search` or `/find_house` is called without one.
pub const DEFAULT_QUERY: &str = "10 Marla house DHA Phase 6 under 5 Crore";

pub const DEFAULT_SERPER_API_URL: &str = "https://google.serper.dev/search";
pub const DEFAULT_BROWSERLESS_API_URL: &str = "https://chrome.browserless.io/content";
pub const DEFAULT_HUGGINGFACE_API_URL: &str = "https://router.huggingface.co/hf-inference/models";
pub const DEFAULT_HUGGINGFACE_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";

pub const DEFAULT_SEARCH_NUM: u32 = 10;
pub const DEFAULT_SEARCH_URL_LIMIT: usize = 5;
pub const DEFAULT_PIPELINE_URL_LIMIT: usize = 3;
pub const DEFAULT_ANALYZE_MAX_CHARS: usize = 512;
pub const DEFAULT_RENDER_WAIT_FOR_MS: u64 = 2000;
pub const DEFAULT_RENDER_WAIT_UNTIL: &str = "networkidle0";

/// Credentials for the three upstream services. `Debug` never prints them.
#[derive(Clone)]
pub struct ApiKeys {
    pub serper: String,
    pub browserless: String,
    pub huggingface: String,
}

impl ApiKeys {
    pub fn new(
        serper: impl Into<String>,
        browserless: impl Into<String>,
        huggingface: impl Into<String>,
    ) -> Self {
        Self {
            serper: serper.into(),
            browserless: browserless.into(),
            huggingface: huggingface.into(),
        }
    }
}

impl fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeys")
            .field("serper", &"<redacted>")
            .field("browserless", &"<redacted>")
            .field("huggingface", &"<redacted>")
            .finish()
    }
}

/// Browserless page-load policy, applied to every extraction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    pub wait_for_ms: Option<u64>,
    pub wait_until: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            wait_for_ms: Some(DEFAULT_RENDER_WAIT_FOR_MS),
            wait_until: Some(DEFAULT_RENDER_WAIT_UNTIL.to_string()),
        }
    }
}

/// Process-wide configuration, built once at startup and read-only afterwards.
#[derive(Clone, Debug)]
pub struct ScoutConfig {
    pub keys: ApiKeys,
    pub serper_url: Url,
    pub browserless_url: Url,
    /// Full model endpoint (base URL joined with the model id).
    pub huggingface_url: Url,
    pub search_num: u32,
    pub search_url_limit: usize,
    pub pipeline_url_limit: usize,
    pub analyze_max_chars: usize,
    pub render: RenderOptions,
    pub http_timeout: Duration,
    pub connect_timeout: Duration,
}

impl ScoutConfig {
    /// Defaults for everything except credentials.
    pub fn new(keys: ApiKeys) -> Result<Self, ConfigError> {
        Ok(Self {
            keys,
            serper_url: parse_url(ENV_SERPER_API_URL, DEFAULT_SERPER_API_URL)?,
            browserless_url: parse_url(ENV_BROWSERLESS_API_URL, DEFAULT_BROWSERLESS_API_URL)?,
            huggingface_url: parse_url(
                ENV_HUGGINGFACE_API_URL,
                &model_endpoint(DEFAULT_HUGGINGFACE_API_URL, DEFAULT_HUGGINGFACE_MODEL),
            )?,
            search_num: DEFAULT_SEARCH_NUM,
            search_url_limit: DEFAULT_SEARCH_URL_LIMIT,
            pipeline_url_limit: DEFAULT_PIPELINE_URL_LIMIT,
            analyze_max_chars: DEFAULT_ANALYZE_MAX_CHARS,
            render: RenderOptions::default(),
            http_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        })
    }

    /// Process environment plus `property-scout.json`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok(), &load_file_config())
    }

    /// Resolve every field as: variable from `lookup` → file field → default.
    pub fn from_lookup<F>(lookup: F, file: &ScoutFileConfig) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |name: &'static str| var(name).ok_or(ConfigError::MissingVar(name));

        let keys = ApiKeys {
            serper: require(ENV_SERPER_API_KEY)?,
            browserless: require(ENV_BROWSERLESS_API_KEY)?,
            huggingface: require(ENV_HUGGINGFACE_API_KEY)?,
        };

        let serper_url = var(ENV_SERPER_API_URL)
            .or_else(|| file.serper_api_url.clone())
            .unwrap_or_else(|| DEFAULT_SERPER_API_URL.to_string());
        let browserless_url = var(ENV_BROWSERLESS_API_URL)
            .or_else(|| file.browserless_api_url.clone())
            .unwrap_or_else(|| DEFAULT_BROWSERLESS_API_URL.to_string());
        let huggingface_base = var(ENV_HUGGINGFACE_API_URL)
            .or_else(|| file.huggingface_api_url.clone())
            .unwrap_or_else(|| DEFAULT_HUGGINGFACE_API_URL.to_string());
        let huggingface_model = var(ENV_HUGGINGFACE_MODEL)
            .or_else(|| file.huggingface_model.clone())
            .unwrap_or_else(|| DEFAULT_HUGGINGFACE_MODEL.to_string());

        let search_num = parse_var::<u32>(ENV_SEARCH_NUM, var(ENV_SEARCH_NUM))?
            .or(file.search_num)
            .unwrap_or(DEFAULT_SEARCH_NUM);
        if search_num == 0 {
            return Err(ConfigError::InvalidValue {
                var: ENV_SEARCH_NUM,
                value: "0".to_string(),
            });
        }

        let search_url_limit = parse_var(ENV_SEARCH_URL_LIMIT, var(ENV_SEARCH_URL_LIMIT))?
            .or(file.search_url_limit)
            .unwrap_or(DEFAULT_SEARCH_URL_LIMIT);
        let pipeline_url_limit = parse_var(ENV_PIPELINE_URL_LIMIT, var(ENV_PIPELINE_URL_LIMIT))?
            .or(file.pipeline_url_limit)
            .unwrap_or(DEFAULT_PIPELINE_URL_LIMIT);
        let analyze_max_chars = parse_var(ENV_ANALYZE_MAX_CHARS, var(ENV_ANALYZE_MAX_CHARS))?
            .or(file.analyze_max_chars)
            .unwrap_or(DEFAULT_ANALYZE_MAX_CHARS);

        let wait_for_ms = parse_var::<u64>(ENV_RENDER_WAIT_FOR_MS, var(ENV_RENDER_WAIT_FOR_MS))?
            .or(file.render_wait_for_ms)
            .unwrap_or(DEFAULT_RENDER_WAIT_FOR_MS);
        // An explicitly empty RENDER_WAIT_UNTIL disables the option, so read it raw.
        let wait_until = lookup(ENV_RENDER_WAIT_UNTIL)
            .map(|v| v.trim().to_string())
            .or_else(|| file.render_wait_until.clone())
            .unwrap_or_else(|| DEFAULT_RENDER_WAIT_UNTIL.to_string());

        let http_timeout = parse_var(ENV_HTTP_TIMEOUT_SECS, var(ENV_HTTP_TIMEOUT_SECS))?
            .or(file.http_timeout_secs)
            .unwrap_or(30);
        let connect_timeout =
            parse_var(ENV_HTTP_CONNECT_TIMEOUT_SECS, var(ENV_HTTP_CONNECT_TIMEOUT_SECS))?
                .or(file.http_connect_timeout_secs)
                .unwrap_or(10);

        Ok(Self {
            keys,
            serper_url: parse_url(ENV_SERPER_API_URL, &serper_url)?,
            browserless_url: parse_url(ENV_BROWSERLESS_API_URL, &browserless_url)?,
            huggingface_url: parse_url(
                ENV_HUGGINGFACE_API_URL,
                &model_endpoint(&huggingface_base, &huggingface_model),
            )?,
            search_num,
            search_url_limit,
            pipeline_url_limit,
            analyze_max_chars,
            render: RenderOptions {
                wait_for_ms: (wait_for_ms > 0).then_some(wait_for_ms),
                wait_until: (!wait_until.is_empty()).then_some(wait_until),
            },
            http_timeout: Duration::from_secs(http_timeout),
            connect_timeout: Duration::from_secs(connect_timeout),
        })
    }
}

fn parse_var<T: FromStr>(var: &'static str, raw: Option<String>) -> Result<Option<T>, ConfigError> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}

fn parse_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { var, source })
}

fn model_endpoint(base: &str, model: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        model.trim_start_matches('/')
    )
}
