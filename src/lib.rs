pub mod core;
pub mod mcp;
pub mod server;
pub mod tools;

// --- Primary core exports ---
pub use crate::core::config::{self, ApiKeys, RenderOptions, ScoutConfig};
pub use crate::core::error::{ConfigError, Upstream, UpstreamError};
pub use crate::core::types;
pub use crate::core::types::*;
pub use crate::core::AppState;

pub use mcp::stdio as stdio_service;
pub use tools::{analyze, extract, pipeline, search};
