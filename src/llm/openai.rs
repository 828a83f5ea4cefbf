use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::LlmConfig;
use crate::error::{AtlasError, Result};

use super::dto::{ChatMessage, Completion, FunctionSchema, ToolCallRequest};
use super::CompletionClient;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);

/// OpenAI-compatible chat-completions client.
pub struct OpenAiClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(COMPLETION_TIMEOUT)
            .build()?;

        Ok(Self { config, http })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[FunctionSchema],
    ) -> Result<Completion> {
        let mut body = json!({
            "model": self.config.model,
            "messages": messages,
        });
        if !tools.is_empty() {
            body["tools"] = serde_json::to_value(tools)?;
            body["tool_choice"] = json!("auto");
        }

        tracing::debug!(model = %self.config.model, messages = messages.len(), "Completion request");

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(AtlasError::api_error(format!("HTTP {status}: {text}")));
        }

        let parsed: CompletionsResponse = response.json().await?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AtlasError::api_error("Completion response had no choices"))?;

        Ok(Completion {
            content: choice.message.content,
            tool_calls: choice.message.tool_calls.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CompletionsResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCallRequest>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tool_call_response() {
        let sample = r#"{
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": "search_products", "arguments": "{\"query\":\"monitor\"}" }
                    }]
                }
            }]
        }"#;
        let parsed: CompletionsResponse = serde_json::from_str(sample).unwrap();
        let message = &parsed.choices[0].message;
        assert!(message.content.is_none());
        let calls = message.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].function.name, "search_products");
    }

    #[test]
    fn parse_text_response() {
        let sample = r#"{
            "choices": [{
                "message": { "role": "assistant", "content": "Hello there" }
            }]
        }"#;
        let parsed: CompletionsResponse = serde_json::from_str(sample).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("Hello there")
        );
    }

    #[test]
    fn completions_url_handles_trailing_slash() {
        let client = OpenAiClient::new(LlmConfig {
            api_key: "sk-test".into(),
            model: "gpt-4o-mini".into(),
            base_url: "https://api.openai.com/v1/".into(),
        })
        .unwrap();
        assert_eq!(
            client.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }
}
