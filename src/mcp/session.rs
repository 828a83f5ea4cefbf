use serde_json::{json, Value};

use crate::error::{AtlasError, Result};

use super::dto::{McpResponse, ToolDescriptor, ToolOutput};
use super::transport::HttpTransport;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Client session against one MCP server. The handshake must complete before
/// any tool operation; `list_tools` and `call_tool` run the documented
/// check-and-initialize step themselves, against this same session.
pub struct McpSession {
    transport: HttpTransport,
    initialized: bool,
    server_info: Value,
}

impl McpSession {
    pub fn new(transport: HttpTransport) -> Self {
        Self {
            transport,
            initialized: false,
            server_info: Value::Null,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    /// Perform the initialize request / initialized notification handshake.
    /// Re-entry on an initialized session returns the cached server info
    /// without touching the network.
    pub async fn initialize(&mut self) -> Result<Value> {
        if self.initialized {
            return Ok(self.server_info.clone());
        }

        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            }
        });

        let response = self.require_response("initialize", params).await?;
        let server_info = response.result.unwrap_or_else(|| json!({}));

        self.transport
            .send("notifications/initialized", json!({}), false)
            .await?;

        self.initialized = true;
        self.server_info = server_info.clone();

        let server_name = self
            .server_info
            .pointer("/serverInfo/name")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        tracing::info!(server = server_name, "MCP session initialized");

        Ok(server_info)
    }

    /// Fetch the tool catalog. The result is a snapshot; call again to
    /// refresh it.
    pub async fn list_tools(&mut self) -> Result<Vec<ToolDescriptor>> {
        self.initialize().await?;

        let response = self.require_response("tools/list", json!({})).await?;
        let tools = match response.result {
            Some(result) => match result.get("tools") {
                Some(tools) => serde_json::from_value(tools.clone())?,
                None => Vec::new(),
            },
            None => Vec::new(),
        };

        Ok(tools)
    }

    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> Result<ToolOutput> {
        self.initialize().await?;

        tracing::info!(tool = name, "Calling tool");

        let params = json!({ "name": name, "arguments": arguments });
        let response = self.require_response("tools/call", params).await?;

        if let Some(error) = response.error {
            return Err(AtlasError::tool_error(
                error.message.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        let result = response.result.unwrap_or_else(|| json!({}));

        // Content is an ordered list of items; only the text of the first
        // one is surfaced.
        if let Some(first) = result.get("content").and_then(Value::as_array).and_then(|items| items.first()) {
            let text = first.get("text").and_then(Value::as_str).unwrap_or_default();
            return Ok(ToolOutput::Text(text.to_string()));
        }

        Ok(ToolOutput::Structured(result))
    }

    /// Tear down the session, releasing the HTTP transport.
    pub fn close(self) {
        tracing::debug!("Closing MCP session");
    }

    async fn require_response(&self, method: &str, params: Value) -> Result<McpResponse> {
        self.transport
            .send(method, params, true)
            .await?
            .ok_or_else(|| AtlasError::protocol_error(format!("No response for {}", method)))
    }
}
