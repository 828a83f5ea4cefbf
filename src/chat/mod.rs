//! Conversation orchestration: owns the transcript and drives one user turn
//! end-to-end through the completion service and the MCP session.

use serde_json::Value;

use crate::config::AtlasConfig;
use crate::error::{AtlasError, Result};
use crate::llm::{
    to_function_schemas, ChatMessage, CompletionClient, FunctionSchema, ToolCallRequest,
};
use crate::mcp::session::McpSession;
use crate::mcp::transport::HttpTransport;

pub const SYSTEM_PROMPT: &str = "\
You are a helpful customer support assistant for a computer products company.
You have access to tools to help customers with:
- Browsing and searching products (monitors, printers, computers)
- Checking product details and availability
- Looking up customer information
- Viewing and creating orders

Be friendly, helpful, and professional. Use the available tools to provide accurate information.";

/// Long-lived client context: one MCP session, one completion client, the
/// projected tool schemas and the transcript. Constructed once at process
/// start, released at shutdown.
pub struct ChatContext {
    session: McpSession,
    llm: Box<dyn CompletionClient>,
    tools: Vec<FunctionSchema>,
    transcript: Vec<ChatMessage>,
    system_prompt: String,
}

impl ChatContext {
    /// Connect to the MCP server, complete the handshake and snapshot the
    /// tool catalog.
    pub async fn connect(config: &AtlasConfig, llm: Box<dyn CompletionClient>) -> Result<Self> {
        let transport = HttpTransport::new(&config.mcp.server_url, config.mcp.timeout())?;
        let mut session = McpSession::new(transport);
        session.initialize().await?;

        let descriptors = session.list_tools().await?;
        let tools = to_function_schemas(&descriptors);
        tracing::info!(tools = tools.len(), "Connected to MCP server");

        Ok(Self {
            session,
            llm,
            tools,
            transcript: Vec::new(),
            system_prompt: SYSTEM_PROMPT.to_string(),
        })
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn function_schemas(&self) -> &[FunctionSchema] {
        &self.tools
    }

    /// Drop the whole transcript. Individual entries are never mutated or
    /// removed; this full reset is the only way back.
    pub fn clear(&mut self) {
        self.transcript.clear();
    }

    /// Process one user turn: a completion request, at most one round of
    /// tool calls, then a follow-up completion. Returns the updated
    /// transcript. Any failure aborts the turn and propagates.
    pub async fn process_message(&mut self, user_text: impl Into<String>) -> Result<&[ChatMessage]> {
        self.transcript.push(ChatMessage::user(user_text));

        let response = self.llm.complete(&self.with_preamble(), &self.tools).await?;

        if !response.has_tool_calls() {
            self.transcript
                .push(ChatMessage::assistant(response.content.unwrap_or_default()));
            return Ok(&self.transcript);
        }

        let calls = response.tool_calls.clone();
        self.transcript.push(ChatMessage::assistant_with_calls(
            response.content,
            response.tool_calls,
        ));

        // Execute in the order received; results must land in the transcript
        // in that same order.
        for call in &calls {
            let output = self.execute_tool_call(call).await?;
            self.transcript
                .push(ChatMessage::tool(&call.id, &call.function.name, output));
        }

        // One tool round per turn: if the follow-up asks for more tools they
        // are not executed, only its text is kept.
        let follow_up = self.llm.complete(&self.with_preamble(), &self.tools).await?;
        if follow_up.has_tool_calls() {
            tracing::warn!(
                requested = follow_up.tool_calls.len(),
                "Follow-up completion requested more tool calls, ignoring"
            );
        }
        self.transcript
            .push(ChatMessage::assistant(follow_up.content.unwrap_or_default()));

        Ok(&self.transcript)
    }

    /// Tear down the context, releasing the MCP session.
    pub fn close(self) {
        self.session.close();
    }

    async fn execute_tool_call(&mut self, call: &ToolCallRequest) -> Result<String> {
        let arguments: Value = serde_json::from_str(&call.function.arguments).map_err(|e| {
            AtlasError::InvalidToolArguments {
                tool: call.function.name.clone(),
                reason: e.to_string(),
            }
        })?;

        let output = self.session.call_tool(&call.function.name, arguments).await?;
        Ok(output.to_string())
    }

    fn with_preamble(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.transcript.len() + 1);
        messages.push(ChatMessage::system(&self.system_prompt));
        messages.extend(self.transcript.iter().cloned());
        messages
    }
}
