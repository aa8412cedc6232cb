//! Conversion between the conversation model and the default dialect

use serde_json::Value;
use tracing::{debug, warn};

use super::types::*;
use crate::error::{LlmError, LlmResult};
use crate::protocol::{AssistantMessage, ChatRequest, Message, ToolCall, ToolChoice, ToolDefinition};
use crate::reasoning::extract_reasoning;

/// Build the default-dialect request body
///
/// Tool presence drives `tool_choice`: with no tools the field is omitted
/// entirely, with tools and no explicit directive it defaults to `"auto"`.
pub fn build_request(request: &ChatRequest) -> OpenAIRequest {
    let messages = request.messages.iter().map(to_wire_message).collect();

    let tools: Option<Vec<OpenAITool>> = match &request.tools {
        Some(tools) if !tools.is_empty() => Some(tools.iter().map(to_wire_tool).collect()),
        _ => None,
    };
    let tool_choice = tools
        .as_ref()
        .map(|_| tool_choice_value(&request.effective_tool_choice()));

    OpenAIRequest {
        model: request.model.clone(),
        messages,
        stream: false,
        temperature: request.temperature,
        tools,
        tool_choice,
    }
}

fn to_wire_message(message: &Message) -> OpenAIMessage {
    match message {
        Message::System(m) => OpenAIMessage {
            role: "system".to_string(),
            content: Some(m.content.clone()),
            tool_calls: None,
            name: None,
            tool_call_id: None,
            reasoning_content: None,
        },
        Message::User(m) => OpenAIMessage {
            role: "user".to_string(),
            content: Some(m.content.clone()),
            tool_calls: None,
            name: None,
            tool_call_id: None,
            reasoning_content: None,
        },
        Message::Assistant(m) => {
            // Replay reasoning from the message itself, falling back to
            // whatever the retained payload still carries.
            let reasoning_content = m
                .reasoning
                .clone()
                .filter(|r| !r.is_empty())
                .or_else(|| m.raw.as_ref().and_then(extract_reasoning));
            OpenAIMessage {
                role: "assistant".to_string(),
                content: m.content.clone(),
                tool_calls: m
                    .tool_calls
                    .as_ref()
                    .map(|calls| calls.iter().map(to_wire_tool_call).collect()),
                name: None,
                tool_call_id: None,
                reasoning_content,
            }
        }
        Message::Tool(m) => OpenAIMessage {
            role: "tool".to_string(),
            content: Some(m.content.clone()),
            tool_calls: None,
            name: Some(m.name.clone()),
            tool_call_id: m.id.clone(),
            reasoning_content: None,
        },
    }
}

fn to_wire_tool_call(tool_call: &ToolCall) -> OpenAIToolCall {
    OpenAIToolCall {
        id: tool_call.id.clone(),
        tool_type: Some("function".to_string()),
        name: Some(tool_call.name.clone()),
        function: OpenAIFunctionCall {
            name: tool_call.name.clone(),
            arguments: Value::Object(tool_call.arguments.clone()).to_string(),
        },
    }
}

fn to_wire_tool(tool: &ToolDefinition) -> OpenAITool {
    OpenAITool {
        tool_type: "function".to_string(),
        function: OpenAIFunction {
            name: tool.name.clone(),
            description: tool.description.clone(),
            parameters: Some(tool.parameters.clone()),
        },
    }
}

/// Wire form of a tool-choice directive for this dialect
pub fn tool_choice_value(choice: &ToolChoice) -> Value {
    match choice {
        ToolChoice::Auto => Value::String("auto".to_string()),
        ToolChoice::None => Value::String("none".to_string()),
        ToolChoice::Required => Value::String("required".to_string()),
        ToolChoice::Tool(name) => serde_json::json!({
            "type": "function",
            "function": { "name": name }
        }),
    }
}

/// Adjust a merged request body for think mode on this dialect
///
/// With think mode off, `gpt-5` is pinned to minimal reasoning effort and
/// any table-configured `reasoning_effort` is dropped for other models.
/// With think mode on, the body is left alone.
pub fn apply_think_mode(body: &mut serde_json::Map<String, Value>, enable_think: bool) {
    if enable_think {
        return;
    }
    let model = body.get("model").and_then(Value::as_str).unwrap_or("");
    if model == "gpt-5" {
        body.insert(
            "reasoning_effort".to_string(),
            Value::String("minimal".to_string()),
        );
    } else if body.remove("reasoning_effort").is_some() {
        debug!("removed reasoning_effort from think-off request");
    }
}

/// Parse a default-dialect response body into a normalized assistant turn
///
/// Usage and cost are attached by the caller; this reads the first choice,
/// requires it to be an assistant message, and retains the choice object
/// (with extracted reasoning injected) as the raw payload.
pub fn parse_response(body: &Value) -> LlmResult<AssistantMessage> {
    let first = body
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .cloned()
        .ok_or_else(|| {
            LlmError::UnexpectedShape(format!("missing or empty 'choices' field: {body}"))
        })?;

    let choice: OpenAIChoice = serde_json::from_value(first.clone())
        .map_err(|e| LlmError::UnexpectedShape(format!("malformed choice object: {e}")))?;
    if choice.message.role != "assistant" {
        return Err(LlmError::UnexpectedShape(format!(
            "expected an assistant message, got role '{}'",
            choice.message.role
        )));
    }

    let reasoning = extract_reasoning(&first);

    // Retain the choice object, ensuring extracted reasoning survives on
    // the message for later replay.
    let mut raw = first;
    if let Some(text) = &reasoning {
        if let Some(message) = raw.get_mut("message").and_then(Value::as_object_mut) {
            let missing = match message.get("reasoning_content") {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.is_empty(),
                Some(_) => false,
            };
            if missing {
                message.insert(
                    "reasoning_content".to_string(),
                    Value::String(text.clone()),
                );
            }
        }
    }

    let tool_calls = parse_tool_calls(choice.message.tool_calls.unwrap_or_default());

    Ok(AssistantMessage {
        content: choice.message.content,
        tool_calls,
        cost: None,
        usage: None,
        raw: Some(raw),
        reasoning,
    })
}

/// Normalize wire tool calls; an empty list becomes `None`
pub(crate) fn parse_tool_calls(wire: Vec<OpenAIToolCall>) -> Option<Vec<ToolCall>> {
    let calls: Vec<ToolCall> = wire
        .into_iter()
        .map(|tc| {
            let arguments = parse_arguments(&tc.function.arguments, &tc.function.name);
            ToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments,
            }
        })
        .collect();
    if calls.is_empty() {
        None
    } else {
        Some(calls)
    }
}

/// Decode a JSON-string argument payload, degrading to an empty object
fn parse_arguments(raw: &str, tool: &str) -> serde_json::Map<String, Value> {
    if raw.is_empty() {
        return serde_json::Map::new();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!(tool, "tool-call arguments are not a JSON object: {other}");
            serde_json::Map::new()
        }
        Err(e) => {
            warn!(tool, raw, "unparseable tool-call arguments: {e}");
            serde_json::Map::new()
        }
    }
}
