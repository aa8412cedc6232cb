//! Default chat-completions dialect
//!
//! Flat message list, `{"type": "function", ...}` tool wrappers, bearer
//! auth. Every model speaks this dialect unless the call is routed to a
//! Claude-native endpoint.

pub mod convert;
pub mod types;

pub use convert::{apply_think_mode, build_request, parse_response, tool_choice_value};
pub use types::{OpenAIMessage, OpenAIRequest, OpenAIResponse, OpenAIToolCall};
