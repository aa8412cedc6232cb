//! Provider-agnostic generation client.
//!
//! `LlmClient` owns a pooled HTTP client and a model table. `generate` looks
//! up the requested model, builds the wire body for the endpoint's dialect,
//! sends it with retries, and normalizes whatever shape comes back into an
//! `AssistantMessage` with usage and cost attached.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use crate::config::{ModelConfig, ModelTable};
use crate::error::{LlmError, LlmResult};
use crate::http::{HttpClient, RetryPolicy};
use crate::pricing::cost_for_usage;
use crate::protocol::{AssistantMessage, ChatRequest};
use crate::providers::{anthropic, normalize_response, openai};

/// Client for chat-completion style endpoints.
///
/// Cloning is cheap; the underlying connection pool and model table are
/// shared across clones.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: HttpClient,
    table: Arc<ModelTable>,
    retry: RetryPolicy,
}

impl LlmClient {
    /// Creates a client over `table` with default HTTP and retry settings.
    pub fn new(table: ModelTable) -> LlmResult<Self> {
        Ok(Self {
            http: HttpClient::new()?,
            table: Arc::new(table),
            retry: RetryPolicy::default(),
        })
    }

    /// Replaces the HTTP transport. Mainly useful for tuning timeouts.
    pub fn with_http(mut self, http: HttpClient) -> Self {
        self.http = http;
        self
    }

    /// Replaces the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the configuration for `model`, if the table knows it.
    pub fn model_config(&self, model: &str) -> Option<&ModelConfig> {
        self.table.get(model)
    }

    /// Sends `request` to its configured endpoint and returns the assistant
    /// turn.
    ///
    /// Transport failures, HTTP 500s, unparseable bodies, and transient API
    /// errors are retried with exponential backoff; invalid-request errors
    /// and malformed response shapes fail immediately.
    pub async fn generate(&self, request: &ChatRequest) -> LlmResult<AssistantMessage> {
        match self.generate_inner(request).await {
            Ok(message) => Ok(message),
            Err(err) => {
                error!(model = %request.model, "generation failed: {err}");
                Err(err)
            }
        }
    }

    async fn generate_inner(&self, request: &ChatRequest) -> LlmResult<AssistantMessage> {
        let config = self
            .table
            .get(&request.model)
            .ok_or_else(|| LlmError::ModelNotConfigured(request.model.clone()))?;

        let (body, headers) = prepare_call(request, config)?;
        let body = Value::Object(body);

        let response = self.send_with_retry(&config.base_url, &body, &headers).await?;
        let mut message = normalize_response(&response)?;
        if let Some(usage) = &message.usage {
            message.cost = Some(cost_for_usage(usage, config.cost_1m_token_dollar.as_ref()));
        }
        Ok(message)
    }

    async fn send_with_retry(
        &self,
        url: &str,
        body: &Value,
        headers: &HashMap<String, String>,
    ) -> LlmResult<Value> {
        let mut attempt: u32 = 0;
        loop {
            match self.send_once(url, body, headers).await {
                Ok(parsed) => return Ok(parsed),
                Err(err) if self.retry.should_retry(&err, attempt) => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "request failed, retrying: {err}"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One send: transport, status check, body parse, and error-body
    /// classification. Every failure path maps to an `LlmError` whose
    /// retryability drives the loop above.
    async fn send_once(
        &self,
        url: &str,
        body: &Value,
        headers: &HashMap<String, String>,
    ) -> LlmResult<Value> {
        let response = self.http.post_json(url, body, headers).await?;
        if response.status == 500 {
            return Err(LlmError::Http {
                status: 500,
                message: truncate(&response.body),
            });
        }
        let parsed = response.json()?;
        if let Some(err) = LlmError::from_error_body(&parsed) {
            return Err(err);
        }
        Ok(parsed)
    }
}

/// Builds the wire body and headers for one call.
///
/// The typed request serializes to a JSON object, table extras are merged on
/// top (extras win), and the result is adapted for the endpoint's dialect:
/// native Claude endpoints get the full body rewrite, everything else gets
/// the think-mode knob.
fn prepare_call(
    request: &ChatRequest,
    config: &ModelConfig,
) -> LlmResult<(Map<String, Value>, HashMap<String, String>)> {
    let wire = openai::build_request(request);
    let Value::Object(mut body) = serde_json::to_value(&wire)? else {
        return Err(LlmError::Parse(
            "request did not serialize to a JSON object".to_string(),
        ));
    };

    // Table extras override anything the builder set, including "model".
    for (key, value) in &config.extra {
        body.insert(key.clone(), value.clone());
    }

    let native = anthropic::uses_native_dialect(&request.model, &config.base_url);

    let mut headers = config.headers.clone();
    if native && headers.contains_key("x-api-key") && headers.remove("Authorization").is_some() {
        debug!("dropped Authorization header in favor of x-api-key");
    }

    if native {
        anthropic::adapt_request_body(&mut body, request)?;
    } else {
        let tools_missing = match body.get("tools") {
            None | Some(Value::Null) => true,
            Some(Value::Array(entries)) => entries.is_empty(),
            Some(_) => false,
        };
        if tools_missing && body.remove("tool_choice").is_some() {
            debug!("removed tool_choice because the request offers no tools");
        }
        openai::apply_think_mode(&mut body, request.enable_think);
    }

    Ok((body, headers))
}

fn truncate(body: &str) -> String {
    const LIMIT: usize = 200;
    if body.len() <= LIMIT {
        return body.to_string();
    }
    let mut end = LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
