//! Wire dialects and response normalization
//!
//! Requests pick a dialect from the model id and endpoint; responses are
//! classified by body shape alone, so a proxy that answers a Claude model
//! in default-dialect form (or the reverse) still parses.

pub mod anthropic;
pub mod openai;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{LlmError, LlmResult};
use crate::protocol::{AssistantMessage, Usage};

/// Which dialect a response body is shaped as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Default chat-completions shape, `choices` at the top level
    OpenAI,
    /// Native shape, `content` blocks without `choices`
    Anthropic,
}

/// Classify a response body by shape
///
/// `choices` wins when both markers are present; a body with neither is
/// unclassifiable and `None` here becomes a shape error upstream.
pub fn classify_response(body: &Value) -> Option<ResponseKind> {
    let obj = body.as_object()?;
    if obj.contains_key("choices") {
        Some(ResponseKind::OpenAI)
    } else if obj.contains_key("content") {
        Some(ResponseKind::Anthropic)
    } else {
        None
    }
}

/// Accepts both dialects' field names for token counts
#[derive(Debug, Deserialize)]
struct WireUsage {
    #[serde(default, alias = "input_tokens")]
    prompt_tokens: u64,
    #[serde(default, alias = "output_tokens")]
    completion_tokens: u64,
}

/// Token usage from a response body
///
/// A missing or null `usage` is `None`, never a zero-filled report; a
/// present object with missing counts zero-fills the gaps.
pub fn parse_usage(body: &Value) -> Option<Usage> {
    let usage = body.get("usage")?;
    if usage.is_null() {
        return None;
    }
    let wire: WireUsage = serde_json::from_value(usage.clone()).ok()?;
    Some(Usage::new(wire.prompt_tokens, wire.completion_tokens))
}

/// Parse a response body of either dialect into a normalized assistant
/// turn, with usage attached
///
/// Cost is the caller's concern; it needs the price table.
pub fn normalize_response(body: &Value) -> LlmResult<AssistantMessage> {
    let mut message = match classify_response(body) {
        Some(ResponseKind::OpenAI) => openai::parse_response(body)?,
        Some(ResponseKind::Anthropic) => anthropic::parse_response(body)?,
        None => {
            return Err(LlmError::UnexpectedShape(format!(
                "response has neither 'choices' nor 'content': {body}"
            )))
        }
    };
    message.usage = parse_usage(body);
    Ok(message)
}
