//! Conversion between the conversation model and the Claude-native dialect
//!
//! The native wire differs from the default dialect in every dimension
//! that matters: system text is a top-level field, turns are typed content
//! blocks, tool schemas use `input_schema` without a function wrapper, and
//! `tool_choice` is an object. The adapter rewrites a merged request body
//! in place so table-configured extras survive untouched.

use serde_json::{json, Map, Value};
use tracing::{debug, error, warn};

use super::types::{AnthropicMessage, AnthropicTool, ContentBlock};
use crate::error::{LlmError, LlmResult};
use crate::protocol::{AssistantMessage, ChatRequest, Message, ToolCall};
use crate::reasoning::extract_reasoning;

/// Rebuild conversation turns as native messages
///
/// System turns are collected separately for top-level hoisting. Tool-use
/// ids missing from the conversation are synthesized from one counter that
/// spans the whole conversation, so replayed ids never collide.
pub fn convert_messages(
    messages: &[Message],
    enable_think: bool,
) -> (Vec<AnthropicMessage>, Vec<String>) {
    let mut out = Vec::new();
    let mut system_prompts = Vec::new();
    let mut auto_tool_counter: u32 = 0;

    for message in messages {
        match message {
            Message::System(m) => {
                if !m.content.is_empty() {
                    system_prompts.push(m.content.clone());
                }
            }
            Message::User(m) => {
                let mut blocks = vec![ContentBlock::text(&m.content)];
                if let Some(calls) = &m.tool_calls {
                    for call in calls {
                        auto_tool_counter += 1;
                        blocks.push(tool_use_block(call, "user", auto_tool_counter));
                    }
                }
                out.push(AnthropicMessage::user(blocks));
            }
            Message::Assistant(m) => {
                let mut blocks = Vec::new();
                let reasoning = m
                    .reasoning
                    .clone()
                    .filter(|r| !r.is_empty())
                    .or_else(|| m.raw.as_ref().and_then(extract_reasoning));
                if enable_think {
                    if let Some(thinking) = reasoning {
                        blocks.push(ContentBlock::Thinking { thinking });
                    }
                }
                if let Some(content) = &m.content {
                    blocks.push(ContentBlock::text(content));
                }
                if let Some(calls) = &m.tool_calls {
                    for call in calls {
                        auto_tool_counter += 1;
                        blocks.push(tool_use_block(call, "assistant", auto_tool_counter));
                    }
                }
                if blocks.is_empty() {
                    blocks.push(ContentBlock::text(""));
                }
                out.push(AnthropicMessage::assistant(blocks));
            }
            Message::Tool(m) => {
                auto_tool_counter += 1;
                let tool_use_id = m
                    .id
                    .clone()
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| format!("toolu_result_{auto_tool_counter}"));
                out.push(AnthropicMessage::user(vec![ContentBlock::ToolResult {
                    tool_use_id,
                    content: m.content.clone(),
                    is_error: m.error.then_some(true),
                }]));
            }
        }
    }

    (out, system_prompts)
}

fn tool_use_block(call: &ToolCall, origin: &str, counter: u32) -> ContentBlock {
    let id = call
        .id
        .clone()
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("toolu_{origin}_{counter}"));
    ContentBlock::ToolUse {
        id,
        name: call.name.clone(),
        input: Value::Object(call.arguments.clone()),
    }
}

/// Adapt a merged request body in place for a native endpoint
///
/// Replaces `messages`, hoists system text (prepending any `system` value
/// a table extra already put there), toggles `thinking`, rewrites `tools`
/// into native schemas, and remaps `tool_choice`.
pub fn adapt_request_body(body: &mut Map<String, Value>, request: &ChatRequest) -> LlmResult<()> {
    let (wire_messages, system_prompts) = convert_messages(&request.messages, request.enable_think);
    body.insert(
        "messages".to_string(),
        serde_json::to_value(wire_messages)?,
    );

    if !system_prompts.is_empty() {
        let mut parts: Vec<String> = Vec::new();
        if let Some(existing) = body.get("system").and_then(Value::as_str) {
            if !existing.is_empty() {
                parts.push(existing.to_string());
            }
        }
        parts.extend(system_prompts);
        body.insert("system".to_string(), Value::String(parts.join("\n")));
    }

    if request.enable_think {
        body.remove("thinking");
    } else {
        body.insert("thinking".to_string(), json!({"type": "disabled"}));
    }

    adapt_tools(body)?;
    adapt_tool_choice(body);
    Ok(())
}

/// Rewrite the body's `tools` into native schemas
fn adapt_tools(body: &mut Map<String, Value>) -> LlmResult<()> {
    let Some(tools_val) = body.get("tools") else {
        return Ok(());
    };
    if tools_val.is_null() {
        return Ok(());
    }
    let entries: Vec<Value> = match tools_val.as_array() {
        Some(list) if !list.is_empty() => list.clone(),
        _ => {
            body.remove("tools");
            body.remove("tool_choice");
            return Ok(());
        }
    };

    // A table extra may already carry native schemas; revalidate those
    // instead of re-converting.
    let already_native = entries[0].as_object().is_some_and(|t| {
        t.contains_key("name") && t.contains_key("input_schema") && !t.contains_key("function")
    });

    let converted: Vec<AnthropicTool> = if already_native {
        entries.iter().filter_map(revalidate_native_tool).collect()
    } else {
        convert_tools(&entries)
    };

    if converted.is_empty() {
        error!("no usable tool entries after conversion, removing tools");
        body.remove("tools");
        body.remove("tool_choice");
    } else {
        body.insert("tools".to_string(), serde_json::to_value(converted)?);
    }
    Ok(())
}

fn revalidate_native_tool(entry: &Value) -> Option<AnthropicTool> {
    let map = entry.as_object()?;
    let name = map.get("name")?.as_str()?.to_string();
    Some(AnthropicTool {
        name,
        description: map
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        input_schema: map.get("input_schema").cloned().unwrap_or_else(|| json!({})),
    })
}

/// Translate tool schemas of whatever layout into native ones
///
/// Function-wrapper entries are unwrapped, native entries are passed
/// through, and anything else has its fields scraped from the usual
/// aliases. Entries with no recoverable name are dropped.
pub fn convert_tools(tools: &[Value]) -> Vec<AnthropicTool> {
    let mut out = Vec::new();

    for (index, entry) in tools.iter().enumerate() {
        let Some(map) = entry.as_object() else {
            warn!(index, "tool entry is not an object, skipping");
            continue;
        };

        if let Some(func_val) = map.get("function") {
            let Some(func) = func_val.as_object() else {
                warn!(index, "tool entry has a non-object 'function' field, skipping");
                continue;
            };
            let Some(name) = func
                .get("name")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
            else {
                warn!(index, "tool entry is missing a function name, skipping");
                continue;
            };
            out.push(AnthropicTool {
                name: name.to_string(),
                description: func
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                input_schema: func.get("parameters").cloned().unwrap_or_else(|| json!({})),
            });
            debug!(tool = name, "unwrapped function-wrapper tool schema");
        } else if map.contains_key("name") {
            let Some(name) = map
                .get("name")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
            else {
                warn!(index, "tool entry has an empty name, skipping");
                continue;
            };
            if !map.contains_key("input_schema") {
                warn!(tool = name, "native-layout tool without input_schema, using an empty schema");
            }
            out.push(AnthropicTool {
                name: name.to_string(),
                description: map
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                input_schema: map.get("input_schema").cloned().unwrap_or_else(|| json!({})),
            });
            debug!(tool = name, "tool already in native layout");
        } else {
            warn!(index, "tool entry has an unrecognized layout, scraping fields");
            let name = ["name", "tool_name", "function_name"].iter().find_map(|k| {
                map.get(*k)
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
            });
            match name {
                Some(name) => {
                    out.push(AnthropicTool {
                        name: name.to_string(),
                        description: map
                            .get("description")
                            .or_else(|| map.get("tool_description"))
                            .and_then(Value::as_str)
                            .unwrap_or("")
                            .to_string(),
                        input_schema: map
                            .get("input_schema")
                            .or_else(|| map.get("parameters"))
                            .or_else(|| map.get("schema"))
                            .cloned()
                            .unwrap_or_else(|| json!({})),
                    });
                    warn!(tool = name, "scraped tool from unrecognized layout, schema may be incomplete");
                }
                None => error!(index, "no recoverable tool name, dropping entry"),
            }
        }
    }

    if out.len() < tools.len() {
        warn!(
            converted = out.len(),
            total = tools.len(),
            "some tool entries were dropped during conversion"
        );
    }
    out
}

/// Remap the body's `tool_choice` into the native object form
///
/// An explicit `"none"` stays omitted. Every other state with tools
/// present lands on some object directive, `{"type": "any"}` being the
/// fallback.
fn adapt_tool_choice(body: &mut Map<String, Value>) {
    let tools_present = body
        .get("tools")
        .and_then(Value::as_array)
        .is_some_and(|a| !a.is_empty());
    let choice = body.get("tool_choice").cloned();
    let mut explicit_none = false;

    match choice {
        Some(Value::String(s)) if s == "none" => {
            explicit_none = true;
            body.remove("tool_choice");
        }
        _ if !tools_present => {
            body.remove("tool_choice");
        }
        None | Some(Value::Null) => {
            body.insert("tool_choice".to_string(), json!({"type": "any"}));
        }
        Some(Value::String(s)) if s == "auto" || s == "required" => {
            body.insert("tool_choice".to_string(), json!({"type": "any"}));
        }
        Some(Value::String(name)) => {
            body.insert("tool_choice".to_string(), json!({"type": "tool", "name": name}));
        }
        Some(Value::Object(map)) => {
            if map.get("type").and_then(Value::as_str) == Some("function") {
                // Default-dialect named form, carried over by the builder
                // or a table extra.
                match map
                    .get("function")
                    .and_then(|f| f.get("name"))
                    .and_then(Value::as_str)
                {
                    Some(name) => {
                        body.insert(
                            "tool_choice".to_string(),
                            json!({"type": "tool", "name": name}),
                        );
                    }
                    None => {
                        warn!("function-form tool_choice without a name, dropping");
                        body.remove("tool_choice");
                    }
                }
            } else if !map.contains_key("type") {
                warn!("tool_choice object without a type, dropping: {}", Value::Object(map));
                body.remove("tool_choice");
            }
            // Objects that already carry a native type pass through.
        }
        Some(_) => {}
    }

    if tools_present && !explicit_none && !body.contains_key("tool_choice") {
        body.insert("tool_choice".to_string(), json!({"type": "any"}));
    }
}

/// Parse a native response body into a normalized assistant turn
///
/// Text blocks are concatenated, `tool_use` blocks become tool calls, and
/// `thinking`/`reasoning` blocks are left to the reasoning extractor. A
/// body with neither text nor tool calls is an error.
pub fn parse_response(body: &Value) -> LlmResult<AssistantMessage> {
    let empty: Vec<Value> = Vec::new();
    let items = body.get("content").and_then(Value::as_array).unwrap_or(&empty);
    if items.is_empty() {
        warn!("response carries an empty content array: {body}");
    }

    let mut text = String::new();
    let mut tool_calls: Vec<ToolCall> = Vec::new();

    for item in items {
        let Some(obj) = item.as_object() else {
            warn!("unexpected content item, skipping: {item}");
            continue;
        };
        match obj.get("type").and_then(Value::as_str) {
            Some("thinking") | Some("reasoning") => continue,
            Some("text") => {
                if let Some(t) = obj.get("text").and_then(Value::as_str) {
                    text.push_str(t);
                }
            }
            Some("tool_use") => {
                tool_calls.push(ToolCall {
                    id: obj.get("id").and_then(Value::as_str).map(str::to_string),
                    name: obj
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    arguments: parse_tool_input(obj.get("input")),
                });
            }
            _ => {}
        }
    }

    if text.is_empty() && tool_calls.is_empty() {
        return Err(LlmError::EmptyResponse(
            "no text content and no tool calls in response".to_string(),
        ));
    }

    let reasoning = extract_reasoning(body);
    let raw = retained_payload(body, &text, &tool_calls, reasoning.as_deref());

    Ok(AssistantMessage {
        content: if text.is_empty() { None } else { Some(text) },
        tool_calls: if tool_calls.is_empty() {
            None
        } else {
            Some(tool_calls)
        },
        cost: None,
        usage: None,
        raw: Some(raw),
        reasoning,
    })
}

/// Normalize a `tool_use` input into an argument object
///
/// String inputs are decoded as JSON; a string that does not decode is
/// kept under a `raw` key instead of being thrown away.
fn parse_tool_input(input: Option<&Value>) -> Map<String, Value> {
    match input {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                warn!("tool_use input string decoded to a non-object, dropping: {other}");
                Map::new()
            }
            Err(_) => {
                let mut map = Map::new();
                map.insert("raw".to_string(), Value::String(s.clone()));
                map
            }
        },
        Some(other) => {
            warn!("tool_use input is not an object, dropping: {other}");
            Map::new()
        }
    }
}

/// Build the retained payload: the normalized message alongside the full
/// body, with the usage object surfaced when the provider sent one
fn retained_payload(
    body: &Value,
    text: &str,
    tool_calls: &[ToolCall],
    reasoning: Option<&str>,
) -> Value {
    let wire_calls: Vec<Value> = tool_calls
        .iter()
        .map(|tc| {
            json!({
                "id": tc.id,
                "function": {
                    "name": tc.name,
                    "arguments": Value::Object(tc.arguments.clone()).to_string(),
                },
            })
        })
        .collect();

    let mut message = Map::new();
    message.insert("role".to_string(), json!("assistant"));
    message.insert(
        "content".to_string(),
        if text.is_empty() { Value::Null } else { json!(text) },
    );
    message.insert(
        "tool_calls".to_string(),
        if wire_calls.is_empty() {
            Value::Null
        } else {
            Value::Array(wire_calls)
        },
    );
    if let Some(r) = reasoning {
        message.insert("reasoning_content".to_string(), json!(r));
    }

    let mut wrapper = Map::new();
    wrapper.insert("message".to_string(), Value::Object(message));
    wrapper.insert("raw_response".to_string(), body.clone());
    if let Some(usage) = body.get("usage").filter(|u| is_truthy(u)) {
        wrapper.insert("usage".to_string(), usage.clone());
    }
    Value::Object(wrapper)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ToolChoice, ToolDefinition};

    fn args(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn system_turns_hoist_and_join_in_order() {
        let messages = vec![
            Message::system("first rule"),
            Message::user("hi"),
            Message::system("second rule"),
        ];
        let (wire, prompts) = convert_messages(&messages, false);
        assert_eq!(prompts, vec!["first rule", "second rule"]);
        assert_eq!(wire.len(), 1);
        assert_eq!(wire[0].role, "user");
    }

    #[test]
    fn synthesized_tool_ids_share_one_counter() {
        let call = |name: &str| ToolCall::new(name, Map::new());
        let messages = vec![
            Message::User(crate::protocol::UserMessage {
                content: "go".to_string(),
                tool_calls: Some(vec![call("a")]),
                cost: None,
            }),
            Message::Assistant(AssistantMessage::new().with_tool_calls(vec![call("b")])),
            Message::tool("b", "done"),
        ];
        let (wire, _) = convert_messages(&messages, false);

        let user_id = match &wire[0].content[1] {
            ContentBlock::ToolUse { id, .. } => id.clone(),
            other => panic!("expected tool_use, got {other:?}"),
        };
        let assistant_id = match &wire[1].content[0] {
            ContentBlock::ToolUse { id, .. } => id.clone(),
            other => panic!("expected tool_use, got {other:?}"),
        };
        let result_id = match &wire[2].content[0] {
            ContentBlock::ToolResult { tool_use_id, .. } => tool_use_id.clone(),
            other => panic!("expected tool_result, got {other:?}"),
        };
        assert_eq!(user_id, "toolu_user_1");
        assert_eq!(assistant_id, "toolu_assistant_2");
        assert_eq!(result_id, "toolu_result_3");
    }

    #[test]
    fn provided_tool_ids_are_kept() {
        let messages = vec![Message::Assistant(
            AssistantMessage::new()
                .with_tool_calls(vec![ToolCall::new("b", Map::new()).with_id("toolu_real")]),
        )];
        let (wire, _) = convert_messages(&messages, false);
        match &wire[0].content[0] {
            ContentBlock::ToolUse { id, .. } => assert_eq!(id, "toolu_real"),
            other => panic!("expected tool_use, got {other:?}"),
        }
    }

    #[test]
    fn thinking_block_leads_when_replay_is_enabled() {
        let messages = vec![Message::Assistant(
            AssistantMessage::new()
                .with_content("answer")
                .with_reasoning("because"),
        )];

        let (with_think, _) = convert_messages(&messages, true);
        assert_eq!(
            with_think[0].content[0],
            ContentBlock::Thinking {
                thinking: "because".to_string()
            }
        );
        assert_eq!(with_think[0].content[1], ContentBlock::text("answer"));

        let (without_think, _) = convert_messages(&messages, false);
        assert_eq!(without_think[0].content, vec![ContentBlock::text("answer")]);
    }

    #[test]
    fn empty_assistant_turn_pads_with_empty_text() {
        let (wire, _) = convert_messages(
            &[Message::Assistant(AssistantMessage::new())],
            false,
        );
        assert_eq!(wire[0].content, vec![ContentBlock::text("")]);
    }

    #[test]
    fn tool_results_ride_in_user_turns() {
        let mut tool = match Message::tool("search", "boom") {
            Message::Tool(t) => t,
            _ => unreachable!(),
        };
        tool.error = true;
        let (wire, _) = convert_messages(&[Message::Tool(tool)], false);
        assert_eq!(wire[0].role, "user");
        match &wire[0].content[0] {
            ContentBlock::ToolResult {
                content, is_error, ..
            } => {
                assert_eq!(content, "boom");
                assert_eq!(*is_error, Some(true));
            }
            other => panic!("expected tool_result, got {other:?}"),
        }
    }

    #[test]
    fn convert_tools_unwraps_function_wrappers() {
        let tools = vec![json!({
            "type": "function",
            "function": {
                "name": "get_weather",
                "description": "Look up the weather",
                "parameters": {"type": "object"},
            }
        })];
        let converted = convert_tools(&tools);
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].name, "get_weather");
        assert_eq!(converted[0].input_schema, json!({"type": "object"}));
    }

    #[test]
    fn convert_tools_scrapes_unrecognized_layouts() {
        let tools = vec![
            json!({"tool_name": "probe", "tool_description": "poke things", "schema": {"a": 1}}),
            json!({"nothing": "usable"}),
        ];
        let converted = convert_tools(&tools);
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].name, "probe");
        assert_eq!(converted[0].description, "poke things");
        assert_eq!(converted[0].input_schema, json!({"a": 1}));
    }

    #[test]
    fn convert_tools_drops_nameless_entries() {
        let tools = vec![
            json!({"function": {"description": "no name"}}),
            json!({"function": {"name": "kept", "parameters": {}}}),
        ];
        let converted = convert_tools(&tools);
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].name, "kept");
    }

    fn function_form(tool: &AnthropicTool) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": tool.input_schema,
            }
        })
    }

    #[test]
    fn tool_schemas_round_trip_from_every_layout() {
        let tools = vec![
            json!({
                "type": "function",
                "function": {
                    "name": "get_weather",
                    "description": "Look up the weather",
                    "parameters": {"type": "object"},
                }
            }),
            json!({
                "name": "search",
                "description": "Find documents",
                "input_schema": {"type": "object", "required": ["q"]},
            }),
            json!({"tool_name": "probe", "tool_description": "poke things", "schema": {"a": 1}}),
        ];

        let forward = convert_tools(&tools);
        let back: Vec<Value> = forward.iter().map(function_form).collect();
        let again = convert_tools(&back);

        assert_eq!(again, forward);
        assert_eq!(again.len(), 3);
        let expected = [
            ("get_weather", "Look up the weather"),
            ("search", "Find documents"),
            ("probe", "poke things"),
        ];
        for (tool, (name, description)) in again.iter().zip(expected) {
            assert_eq!(tool.name, name);
            assert_eq!(tool.description, description);
        }
    }

    fn adapted_body(request: &ChatRequest, extras: Value) -> Map<String, Value> {
        let wire = crate::providers::openai::build_request(request);
        let mut body = match serde_json::to_value(&wire).unwrap() {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        if let Value::Object(extra) = extras {
            for (k, v) in extra {
                body.insert(k, v);
            }
        }
        adapt_request_body(&mut body, request).unwrap();
        body
    }

    #[test]
    fn adapt_hoists_system_and_prepends_table_value() {
        let request = ChatRequest::new(
            "claude-test",
            vec![Message::system("be kind"), Message::user("hi")],
        );
        let body = adapted_body(&request, json!({"system": "from the table"}));
        assert_eq!(body["system"], json!("from the table\nbe kind"));
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn adapt_disables_thinking_when_replay_is_off() {
        let request = ChatRequest::new("claude-test", vec![Message::user("hi")]);
        let body = adapted_body(&request, json!({}));
        assert_eq!(body["thinking"], json!({"type": "disabled"}));
    }

    #[test]
    fn adapt_drops_configured_thinking_when_replay_is_on() {
        let request = ChatRequest::new("claude-test", vec![Message::user("hi")]).with_think(true);
        let body = adapted_body(
            &request,
            json!({"thinking": {"type": "enabled", "budget_tokens": 2048}}),
        );
        assert!(!body.contains_key("thinking"));
    }

    #[test]
    fn adapt_converts_tools_and_defaults_choice_to_any() {
        let request = ChatRequest::new("claude-test", vec![Message::user("hi")]).with_tools(vec![
            ToolDefinition::new("get_weather", json!({"type": "object"})),
        ]);
        let body = adapted_body(&request, json!({}));
        assert_eq!(body["tools"][0]["name"], "get_weather");
        assert_eq!(body["tools"][0]["input_schema"], json!({"type": "object"}));
        assert!(body["tools"][0].get("function").is_none());
        assert_eq!(body["tool_choice"], json!({"type": "any"}));
    }

    #[test]
    fn adapt_maps_named_choice_to_tool_form() {
        let request = ChatRequest::new("claude-test", vec![Message::user("hi")])
            .with_tools(vec![ToolDefinition::new("get_weather", json!({}))])
            .with_tool_choice(ToolChoice::Tool("get_weather".to_string()));
        let body = adapted_body(&request, json!({}));
        assert_eq!(
            body["tool_choice"],
            json!({"type": "tool", "name": "get_weather"})
        );
    }

    #[test]
    fn adapt_keeps_explicit_none_omitted() {
        let request = ChatRequest::new("claude-test", vec![Message::user("hi")])
            .with_tools(vec![ToolDefinition::new("get_weather", json!({}))])
            .with_tool_choice(ToolChoice::None);
        let mut body = Map::new();
        body.insert("model".to_string(), json!("claude-test"));
        body.insert(
            "tools".to_string(),
            json!([{"type": "function", "function": {"name": "get_weather", "parameters": {}}}]),
        );
        body.insert("tool_choice".to_string(), json!("none"));
        adapt_request_body(&mut body, &request).unwrap();
        assert!(!body.contains_key("tool_choice"));
        assert!(body.contains_key("tools"));
    }

    #[test]
    fn adapt_replaces_malformed_choice_object_with_any() {
        let request = ChatRequest::new("claude-test", vec![Message::user("hi")])
            .with_tools(vec![ToolDefinition::new("get_weather", json!({}))]);
        let body = adapted_body(&request, json!({"tool_choice": {"name": "no type here"}}));
        assert_eq!(body["tool_choice"], json!({"type": "any"}));
    }

    #[test]
    fn adapt_passes_native_choice_objects_through() {
        let request = ChatRequest::new("claude-test", vec![Message::user("hi")])
            .with_tools(vec![ToolDefinition::new("get_weather", json!({}))]);
        let body = adapted_body(
            &request,
            json!({"tool_choice": {"type": "auto", "disable_parallel_tool_use": true}}),
        );
        assert_eq!(
            body["tool_choice"],
            json!({"type": "auto", "disable_parallel_tool_use": true})
        );
    }

    #[test]
    fn adapt_revalidates_native_table_tools() {
        let request = ChatRequest::new("claude-test", vec![Message::user("hi")]);
        let body = adapted_body(
            &request,
            json!({"tools": [{"name": "probe", "input_schema": {"type": "object"}}]}),
        );
        assert_eq!(body["tools"][0]["description"], json!(""));
        assert_eq!(body["tool_choice"], json!({"type": "any"}));
    }

    #[test]
    fn adapt_removes_empty_tool_lists_entirely() {
        let request = ChatRequest::new("claude-test", vec![Message::user("hi")]);
        let body = adapted_body(&request, json!({"tools": [], "tool_choice": "auto"}));
        assert!(!body.contains_key("tools"));
        assert!(!body.contains_key("tool_choice"));
    }

    #[test]
    fn parse_concatenates_text_and_collects_tool_use() {
        let body = json!({
            "content": [
                {"type": "thinking", "thinking": "pondering"},
                {"type": "text", "text": "The weather "},
                {"type": "text", "text": "is mild."},
                {"type": "tool_use", "id": "toolu_1", "name": "get_weather",
                 "input": {"city": "Oslo"}},
            ],
            "usage": {"input_tokens": 12, "output_tokens": 4},
        });
        let message = parse_response(&body).unwrap();
        assert_eq!(message.content.as_deref(), Some("The weather is mild."));
        let calls = message.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].id.as_deref(), Some("toolu_1"));
        assert_eq!(calls[0].arguments.get("city"), Some(&json!("Oslo")));
        assert_eq!(message.reasoning.as_deref(), Some("pondering"));

        let raw = message.raw.unwrap();
        assert_eq!(raw["message"]["reasoning_content"], json!("pondering"));
        assert_eq!(raw["usage"], json!({"input_tokens": 12, "output_tokens": 4}));
        assert_eq!(raw["raw_response"]["content"][1]["text"], json!("The weather "));
        let arguments = raw["message"]["tool_calls"][0]["function"]["arguments"]
            .as_str()
            .unwrap();
        assert_eq!(
            serde_json::from_str::<Value>(arguments).unwrap(),
            json!({"city": "Oslo"})
        );
    }

    #[test]
    fn parse_rejects_empty_content_without_tool_calls() {
        let err = parse_response(&json!({"content": []})).unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse(_)));

        let thinking_only = json!({"content": [{"type": "thinking", "thinking": "hm"}]});
        assert!(matches!(
            parse_response(&thinking_only).unwrap_err(),
            LlmError::EmptyResponse(_)
        ));
    }

    #[test]
    fn parse_normalizes_awkward_tool_inputs() {
        let body = json!({
            "content": [
                {"type": "tool_use", "id": "a", "name": "t1", "input": null},
                {"type": "tool_use", "id": "b", "name": "t2", "input": "{\"x\": 1}"},
                {"type": "tool_use", "id": "c", "name": "t3", "input": "not json"},
            ]
        });
        let message = parse_response(&body).unwrap();
        let calls = message.tool_calls.unwrap();
        assert!(calls[0].arguments.is_empty());
        assert_eq!(calls[1].arguments.get("x"), Some(&json!(1)));
        assert_eq!(calls[2].arguments.get("raw"), Some(&json!("not json")));
    }

    #[test]
    fn parse_skips_malformed_content_items() {
        let body = json!({
            "content": ["stray string", {"type": "text", "text": "kept"}]
        });
        let message = parse_response(&body).unwrap();
        assert_eq!(message.content.as_deref(), Some("kept"));
    }

    #[test]
    fn retained_usage_is_omitted_when_empty() {
        let body = json!({
            "content": [{"type": "text", "text": "hi"}],
            "usage": {},
        });
        let message = parse_response(&body).unwrap();
        assert!(message.raw.unwrap().get("usage").is_none());
    }

    #[test]
    fn tool_use_arguments_survive_via_args_helper() {
        let block = tool_use_block(
            &ToolCall::new("probe", args(&[("depth", json!(3))])),
            "assistant",
            7,
        );
        match block {
            ContentBlock::ToolUse { id, input, .. } => {
                assert_eq!(id, "toolu_assistant_7");
                assert_eq!(input, json!({"depth": 3}));
            }
            other => panic!("expected tool_use, got {other:?}"),
        }
    }
}
