use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{GatewayError, GatewayResult};

/// Outbound seam: one JSON POST per call, no retries.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, payload: &Value) -> GatewayResult<Value>;
}

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self::with_client(Client::new(), timeout)
    }

    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Render an error with every `source()` level, joined by `": "`.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut detail = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        let text = cause.to_string();
        if !detail.contains(&text) {
            detail.push_str(": ");
            detail.push_str(&text);
        }
        current = cause.source();
    }
    detail
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, payload: &Value) -> GatewayResult<Value> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
            .map_err(|err| {
                warn!(url, timeout = err.is_timeout(), "gateway request failed to complete");
                GatewayError::Transport {
                    url: url.to_string(),
                    status: err.status().map(|s| s.as_u16()),
                    detail: error_chain(&err),
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| GatewayError::Transport {
            url: url.to_string(),
            status: Some(status.as_u16()),
            detail: format!("failed to read response body: {err}"),
        })?;

        if !status.is_success() {
            warn!(url, status = status.as_u16(), "gateway returned failure status");
            let detail = if body.is_empty() {
                status.canonical_reason().unwrap_or("no response body").to_string()
            } else {
                body
            };
            return Err(GatewayError::Transport {
                url: url.to_string(),
                status: Some(status.as_u16()),
                detail,
            });
        }

        debug!(url, status = status.as_u16(), "gateway request succeeded");
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }
}
