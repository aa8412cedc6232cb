//! HTTP transport built on reqwest

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{LlmError, LlmResult};

/// Connect timeout; generation can be slow but connecting should not be
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Whole-request timeout, sized for long reasoning generations
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

const USER_AGENT: &str = concat!("parley/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP transport with connection pooling
///
/// Cheap to clone; all clones share one pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a transport with the default timeouts
    pub fn new() -> LlmResult<Self> {
        Self::with_timeouts(CONNECT_TIMEOUT, REQUEST_TIMEOUT)
    }

    /// Create a transport with explicit timeouts
    pub fn with_timeouts(connect_timeout: Duration, request_timeout: Duration) -> LlmResult<Self> {
        let client = ClientBuilder::new()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| LlmError::Network(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// POST a JSON body and return the status with the raw body text
    ///
    /// Status interpretation and body parsing stay with the caller; only
    /// transport-level failures error here.
    pub async fn post_json(
        &self,
        url: &str,
        body: &Value,
        headers: &HashMap<String, String>,
    ) -> LlmResult<HttpResponse> {
        let request_id = Uuid::new_v4();
        debug!(%request_id, url, "sending request");

        let mut builder = self.client.post(url).json(body);
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        builder = builder.header("X-Request-ID", request_id.to_string());

        let response = builder.send().await.map_err(|e| {
            warn!(%request_id, "transport failure: {e}");
            LlmError::from(e)
        })?;

        let status = response.status().as_u16();
        debug!(%request_id, status, "response received");

        let body = response.text().await.map_err(LlmError::from)?;
        Ok(HttpResponse { status, body })
    }
}

/// Status and raw body of one exchange
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Parse the body as JSON
    pub fn json(&self) -> LlmResult<Value> {
        serde_json::from_str(&self.body).map_err(|e| {
            LlmError::Parse(format!(
                "status {}: {e}; body starts with: {}",
                self.status,
                snippet(&self.body)
            ))
        })
    }
}

fn snippet(body: &str) -> &str {
    let end = body
        .char_indices()
        .take(200)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_parse_failure_includes_a_body_snippet() {
        let response = HttpResponse {
            status: 502,
            body: "<html>Bad Gateway</html>".to_string(),
        };
        let err = response.json().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("502"));
        assert!(text.contains("<html>"));
    }

    #[test]
    fn snippet_respects_char_boundaries() {
        let long = "é".repeat(300);
        assert_eq!(snippet(&long).chars().count(), 200);
        assert_eq!(snippet(""), "");
    }
}
