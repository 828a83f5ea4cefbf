pub mod dto;
pub mod schema;
pub mod openai;

use async_trait::async_trait;

use crate::error::Result;

pub use dto::{ChatMessage, Completion, FunctionCall, FunctionSchema, Role, ToolCallRequest};
pub use openai::OpenAiClient;
pub use schema::to_function_schemas;

/// Chat-completion endpoint: takes the transcript plus the advertised
/// function schemas and returns either plain text or requested tool calls.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[FunctionSchema],
    ) -> Result<Completion>;
}
