use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use serde_json::Value;

use crate::error::{AtlasError, Result};

use super::dto::{McpRequest, McpResponse};

pub const JSONRPC_VERSION: &str = "2.0";

/// One JSON-RPC exchange per call over HTTP POST. Stateless apart from the
/// request id counter, which must stay unique for the client lifetime.
pub struct HttpTransport {
    endpoint: String,
    http: reqwest::Client,
    next_id: AtomicI64,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("atlas-chat/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            http,
            next_id: AtomicI64::new(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one request and wait for its correlated response. Notifications
    /// (`expect_response = false`) carry no id and return `None` without
    /// reading a body.
    pub async fn send(
        &self,
        method: &str,
        params: Value,
        expect_response: bool,
    ) -> Result<Option<McpResponse>> {
        let id = if expect_response {
            Some(self.next_id.fetch_add(1, Ordering::SeqCst))
        } else {
            None
        };

        let request = McpRequest {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.map(Value::from),
            method: method.to_string(),
            params: Some(params),
        };

        tracing::debug!(method, id = ?id, "Sending RPC request");

        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        if !expect_response {
            return Ok(None);
        }

        let envelope: McpResponse = response.json().await?;

        if let Some(expected) = id {
            if envelope.id != Some(Value::from(expected)) {
                return Err(AtlasError::protocol_error(format!(
                    "Response id {:?} does not match request id {}",
                    envelope.id, expected
                )));
            }
        }

        Ok(Some(envelope))
    }
}
