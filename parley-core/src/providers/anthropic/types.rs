//! Wire types for the Claude-native dialect

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A conversation turn in native format
///
/// Only `user` and `assistant` roles exist on this wire; system text is a
/// top-level request field and tool results ride inside user turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnthropicMessage {
    pub role: String,
    pub content: Vec<ContentBlock>,
}

/// Typed content block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text
    Text { text: String },
    /// Replayed extended thinking
    Thinking { thinking: String },
    /// A tool invocation by the model
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    /// The result of a tool invocation, echoed back by the caller
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
    },
}

/// Tool schema in native format
///
/// The schema key is `input_schema`, not `parameters`, and there is no
/// `{"type": "function"}` wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnthropicTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl AnthropicMessage {
    pub fn user(content: Vec<ContentBlock>) -> Self {
        Self {
            role: "user".to_string(),
            content,
        }
    }

    pub fn assistant(content: Vec<ContentBlock>) -> Self {
        Self {
            role: "assistant".to_string(),
            content,
        }
    }
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }
}
