//! Provider-agnostic conversation types
//!
//! These are the normalized message structures callers build conversations
//! from and receive results in. Wire-level layouts live in the per-dialect
//! modules under `providers/`; nothing here is tied to a specific API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions that guide the model's behavior
    System,
    /// User input turn
    User,
    /// Assistant (model) turn
    Assistant,
    /// Tool execution result
    Tool,
}

/// A turn in the conversation, tagged by role
///
/// Serializes with an inline `"role"` tag so persisted conversations read
/// as flat `{"role": "...", ...}` records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    /// System instructions
    System(SystemMessage),
    /// User turn
    User(UserMessage),
    /// Assistant turn
    Assistant(AssistantMessage),
    /// Tool result turn
    Tool(ToolMessage),
}

/// System instructions for the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMessage {
    /// Instruction text
    pub content: String,
}

/// A user turn
///
/// User turns may carry tool calls and a cost: in simulated conversations
/// the user side is itself model-generated, so its turns are bookkept the
/// same way assistant turns are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMessage {
    /// User text
    pub content: String,

    /// Tool invocations attributed to the user side, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,

    /// Dollar cost of producing this turn, when it was model-generated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

/// A normalized assistant turn, as returned by generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AssistantMessage {
    /// Assistant text, absent when the turn is tool-calls only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Requested tool invocations; `None` rather than an empty list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,

    /// Dollar cost of this turn, derived from usage and the price table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,

    /// Token accounting as reported by the provider; absent is not zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,

    /// Retained provider payload, kept for later reasoning re-extraction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,

    /// Extracted reasoning/thinking text, when the provider surfaced any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// The result of executing a tool on behalf of the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolMessage {
    /// Tool output text
    pub content: String,

    /// Identifier of the tool call this answers, when the caller tracked one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Name of the tool that ran
    pub name: String,

    /// Whether the tool execution failed
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

/// A tool invocation requested by the model
///
/// `arguments` is always a JSON object after normalization. Providers that
/// return arguments as a string have them parsed by the response
/// normalizer; a string that does not parse becomes the empty object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call identifier, when one was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Name of the tool to invoke
    pub name: String,

    /// Invocation arguments, keyed by parameter name
    pub arguments: serde_json::Map<String, Value>,
}

/// Token usage for a single generation
///
/// Absent usage is represented as `Option::None` on the assistant turn,
/// never as a zero-filled value; zero is a legitimate count for cached
/// prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: u64,

    /// Tokens produced in the completion
    pub completion_tokens: u64,
}

/// Caller-facing tool schema, independent of any wire dialect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,

    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// JSON Schema for the tool's arguments
    pub parameters: Value,
}

/// Tool selection directive, mapped per dialect by the request builders
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ToolChoice {
    /// Let the model decide (dialect default)
    #[default]
    Auto,
    /// Forbid tool use
    None,
    /// The model must call some tool
    Required,
    /// The model must call the named tool
    Tool(String),
}

/// A single generation request against a configured model
///
/// This is the caller-facing input to [`crate::client::LlmClient::generate`].
/// The dialect actually spoken on the wire is decided per call from the
/// model name and the configured endpoint, not by anything carried here.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Key into the model table, also sent as the wire `model` field
    pub model: String,

    /// Conversation so far, oldest turn first
    pub messages: Vec<Message>,

    /// Tools offered to the model for this call
    pub tools: Option<Vec<ToolDefinition>>,

    /// Tool selection directive; defaults to `Auto` when tools are offered
    pub tool_choice: Option<ToolChoice>,

    /// Sampling temperature, omitted from the wire when unset
    pub temperature: Option<f64>,

    /// Whether extended thinking / reasoning effort is enabled
    pub enable_think: bool,
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Message::System(SystemMessage {
            content: content.into(),
        })
    }

    /// Create a plain user message
    pub fn user(content: impl Into<String>) -> Self {
        Message::User(UserMessage {
            content: content.into(),
            tool_calls: None,
            cost: None,
        })
    }

    /// Create a text-only assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant(AssistantMessage {
            content: Some(content.into()),
            ..AssistantMessage::default()
        })
    }

    /// Create a successful tool result message
    pub fn tool(name: impl Into<String>, content: impl Into<String>) -> Self {
        Message::Tool(ToolMessage {
            content: content.into(),
            id: None,
            name: name.into(),
            error: false,
        })
    }

    /// Role of this turn
    pub fn role(&self) -> Role {
        match self {
            Message::System(_) => Role::System,
            Message::User(_) => Role::User,
            Message::Assistant(_) => Role::Assistant,
            Message::Tool(_) => Role::Tool,
        }
    }

    /// Recorded generation cost of this turn, if any
    pub fn cost(&self) -> Option<f64> {
        match self {
            Message::User(m) => m.cost,
            Message::Assistant(m) => m.cost,
            Message::System(_) | Message::Tool(_) => None,
        }
    }
}

impl AssistantMessage {
    /// Create an empty assistant message to extend with `with_*` setters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text content
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the tool calls, normalizing an empty list to `None`
    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCall>) -> Self {
        self.tool_calls = if tool_calls.is_empty() {
            None
        } else {
            Some(tool_calls)
        };
        self
    }

    /// Set the usage report
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Set the derived cost
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Attach the retained provider payload
    pub fn with_raw(mut self, raw: Value) -> Self {
        self.raw = Some(raw);
        self
    }

    /// Set the extracted reasoning text
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    /// Whether the turn carries neither text nor tool calls
    pub fn is_empty(&self) -> bool {
        self.content.as_deref().is_none_or(str::is_empty) && self.tool_calls.is_none()
    }

    /// Re-label this turn as a user message, keeping content and bookkeeping
    ///
    /// Used by simulated-user callers that generate the user side with a
    /// model and feed it back into the conversation.
    pub fn into_user(self) -> UserMessage {
        UserMessage {
            content: self.content.unwrap_or_default(),
            tool_calls: self.tool_calls,
            cost: self.cost,
        }
    }
}

impl ToolCall {
    /// Create a tool call with already-structured arguments
    pub fn new(name: impl Into<String>, arguments: serde_json::Map<String, Value>) -> Self {
        Self {
            id: None,
            name: name.into(),
            arguments,
        }
    }

    /// Set the provider-assigned identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl ToolDefinition {
    /// Create a tool definition from a name and JSON Schema parameters
    pub fn new(name: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Usage {
    /// Create a usage report
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }
}

impl ChatRequest {
    /// Create a request with default knobs (no tools, think mode off)
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: None,
            tool_choice: None,
            temperature: None,
            enable_think: false,
        }
    }

    /// Offer tools to the model
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Set an explicit tool selection directive
    pub fn with_tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(choice);
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Enable or disable extended thinking
    pub fn with_think(mut self, enable: bool) -> Self {
        self.enable_think = enable;
        self
    }

    /// Tool choice with the `Auto` default applied
    pub fn effective_tool_choice(&self) -> ToolChoice {
        self.tool_choice.clone().unwrap_or_default()
    }
}
