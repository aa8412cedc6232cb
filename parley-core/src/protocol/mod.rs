//! Provider-agnostic conversation model
//!
//! Callers assemble conversations from these types and get normalized
//! assistant turns back; the per-dialect wire layouts under `providers/`
//! are conversion targets, never part of the public surface.

pub mod types;

pub use types::{
    AssistantMessage, ChatRequest, Message, Role, SystemMessage, ToolCall, ToolChoice,
    ToolDefinition, ToolMessage, Usage, UserMessage,
};
