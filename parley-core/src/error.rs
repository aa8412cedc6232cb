//! Error types for the invocation core

use serde_json::Value;
use thiserror::Error;

use crate::config::ConfigError;

/// Result type for invocation operations
pub type LlmResult<T> = Result<T, LlmError>;

/// Errors that can occur while generating a completion
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provider rejected the request as malformed; retrying cannot help
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Structured error object returned by the provider
    #[error("api error ({kind}): {message}")]
    Api {
        /// Provider error type or code
        kind: String,
        /// Provider error message
        message: String,
    },

    /// Non-success HTTP status without a usable error body
    #[error("http status {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Body snippet or status text
        message: String,
    },

    /// Network-level failure before a response arrived
    #[error("network error: {0}")]
    Network(String),

    /// Connect or read timeout expired
    #[error("request timed out")]
    Timeout,

    /// Response body was not valid JSON
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Response parsed as JSON but matches neither known dialect
    #[error("unrecognized response shape: {0}")]
    UnexpectedShape(String),

    /// The model produced neither text nor tool calls
    #[error("empty response: {0}")]
    EmptyResponse(String),

    /// The requested model has no entry in the model table
    #[error("model not configured: {0}")]
    ModelNotConfigured(String),

    /// Configuration loading or validation failed
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl LlmError {
    /// Whether the retry engine may re-send the request after this error
    pub fn is_retryable(&self) -> bool {
        match self {
            // Transient by classification: server faults, network trouble,
            // bodies that did not survive transit, and provider error
            // objects other than invalid-request.
            LlmError::Network(_) | LlmError::Timeout | LlmError::Parse(_) => true,
            LlmError::Http { status, .. } => *status >= 500,
            LlmError::Api { .. } => true,
            LlmError::InvalidRequest(_)
            | LlmError::UnexpectedShape(_)
            | LlmError::EmptyResponse(_)
            | LlmError::ModelNotConfigured(_)
            | LlmError::Config(_) => false,
        }
    }

    /// Classify a parsed response body that carries a provider error
    ///
    /// Recognizes both error envelopes: the default dialect's
    /// `{"error": {...}}` and the alternate dialect's
    /// `{"type": "error", "error": {...}}`. Returns `None` when the body
    /// carries neither. A type-tagged envelope with no usable error object
    /// still classifies, as a transient unknown error; an `error` field
    /// holding a non-object is a malformed body. An error whose type
    /// contains `invalid_request` (case-insensitive) maps to
    /// [`LlmError::InvalidRequest`]; every other error object is treated
    /// as transient.
    pub fn from_error_body(body: &Value) -> Option<LlmError> {
        let is_error_envelope = body.get("type").and_then(Value::as_str) == Some("error");

        let error_obj = match (is_error_envelope, body.get("error")) {
            (false, None) => return None,
            (true, None) => None,
            (_, Some(Value::Object(obj))) => Some(obj),
            (_, Some(other)) => {
                return Some(LlmError::UnexpectedShape(format!(
                    "non-object error field: {other}"
                )))
            }
        };

        let kind = error_obj
            .and_then(|o| o.get("type").or_else(|| o.get("code")))
            .and_then(Value::as_str)
            .unwrap_or("unknown_error")
            .to_string();
        let message = error_obj
            .map(|o| {
                o.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| Value::Object(o.clone()).to_string())
            })
            .unwrap_or_else(|| "unknown error".to_string());

        if kind.to_lowercase().contains("invalid_request") {
            Some(LlmError::InvalidRequest(format!("{kind}: {message}")))
        } else {
            Some(LlmError::Api { kind, message })
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else if err.is_connect() {
            LlmError::Network(format!("connection failed: {err}"))
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::Parse(err.to_string())
    }
}
