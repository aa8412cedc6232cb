//! Claude-native dialect
//!
//! Top-level `system`, typed content blocks, `input_schema` tool entries,
//! `x-api-key` auth. Selected per call, never per table entry: a Claude
//! model behind an OpenAI-compatible proxy stays on the default dialect.

pub mod convert;
pub mod types;

pub use convert::{adapt_request_body, convert_messages, convert_tools, parse_response};
pub use types::{AnthropicMessage, AnthropicTool, ContentBlock};

/// Whether a base URL points at a native endpoint rather than an
/// OpenAI-compatible proxy
pub fn is_native_endpoint(base_url: &str) -> bool {
    base_url.contains("/v1/messages") || base_url.contains("api.anthropic.com")
}

/// Whether a call should speak the native dialect
///
/// Both conditions must hold: the model id names a Claude model and the
/// endpoint is native. Response parsing never consults this; it goes by
/// body shape alone.
pub fn uses_native_dialect(model: &str, base_url: &str) -> bool {
    model.to_lowercase().contains("claude") && is_native_endpoint(base_url)
}
