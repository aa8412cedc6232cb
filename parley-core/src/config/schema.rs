//! Model table schema with serde support

use super::error::{ValidationError, ValidationErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The model table: every model the core may be asked to invoke
///
/// Loaded once at startup and immutable afterwards. Files may carry
/// unrelated top-level keys (batch settings, prompt paths, and so on);
/// only the `models` mapping is read here.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModelTable {
    /// Model id -> endpoint, auth, pricing, and request parameters
    #[serde(default)]
    pub models: HashMap<String, ModelConfig>,
}

/// Per-model configuration entry
///
/// The named fields are bookkeeping: they steer the call but are stripped
/// before the request body goes on the wire. Everything else in the entry
/// lands in `extra` and is merged into the request body verbatim, so a
/// table entry can pin `max_tokens`, `reasoning_effort`, or any other
/// provider parameter per model.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    /// Full endpoint URL requests are posted to
    pub base_url: String,

    /// HTTP headers to send, auth included; values support `${VAR}`
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Price per one million tokens, in dollars
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_1m_token_dollar: Option<ModelPricing>,

    /// Advisory prompt-size ceiling for callers that budget input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_input_tokens: Option<u64>,

    /// Human-readable label, never sent on the wire
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Remaining entry keys, merged into the request body as-is
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Token pricing for a model
///
/// Either price may be absent; cost calculation treats an incomplete
/// entry the same as a missing one and reports zero.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct ModelPricing {
    /// Dollars per million prompt tokens
    #[serde(default)]
    pub prompt_price: Option<f64>,

    /// Dollars per million completion tokens
    #[serde(default)]
    pub completion_price: Option<f64>,
}

impl ModelTable {
    /// Look up a model entry by id
    pub fn get(&self, model: &str) -> Option<&ModelConfig> {
        self.models.get(model)
    }

    /// Validate the table
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (id, model) in &self.models {
            model.validate(&format!("models.{}", id))?;
        }
        Ok(())
    }
}

impl ModelConfig {
    /// Minimal entry posting to `base_url`, with no headers or pricing
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headers: HashMap::new(),
            cost_1m_token_dollar: None,
            max_input_tokens: None,
            name: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Validate a single model entry
    pub fn validate(&self, path: &str) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::required(format!("{}.base_url", path)));
        }

        match url::Url::parse(&self.base_url) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    return Err(ValidationError::new(
                        format!("{}.base_url", path),
                        ValidationErrorKind::InvalidUrl {
                            message: format!(
                                "URL scheme must be http or https, got: {}",
                                url.scheme()
                            ),
                        },
                    ));
                }
            }
            Err(e) => {
                return Err(ValidationError::new(
                    format!("{}.base_url", path),
                    ValidationErrorKind::InvalidUrl {
                        message: e.to_string(),
                    },
                ));
            }
        }

        if let Some(pricing) = &self.cost_1m_token_dollar {
            if let Some(price) = pricing.prompt_price {
                if price < 0.0 {
                    return Err(ValidationError::out_of_range(
                        format!("{}.cost_1m_token_dollar.prompt_price", path),
                        "Must be non-negative",
                    ));
                }
            }
            if let Some(price) = pricing.completion_price {
                if price < 0.0 {
                    return Err(ValidationError::out_of_range(
                        format!("{}.cost_1m_token_dollar.completion_price", path),
                        "Must be non-negative",
                    ));
                }
            }
        }

        if self.max_input_tokens == Some(0) {
            return Err(ValidationError::out_of_range(
                format!("{}.max_input_tokens", path),
                "Must be greater than 0",
            ));
        }

        Ok(())
    }
}
