use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// One transcript entry, shaped for the chat-completions wire format.
/// Entries are append-only; once in the transcript they are never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallRequest>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    // Tool name, set on tool-role messages only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }

    pub fn assistant_with_calls(content: Option<String>, calls: Vec<ToolCallRequest>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(content.unwrap_or_default()),
            tool_calls: Some(calls),
            tool_call_id: None,
            name: None,
        }
    }

    pub fn tool(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
            name: Some(name.into()),
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

/// A tool invocation requested by the completion service. Arguments stay a
/// JSON-encoded string until the orchestrator parses them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionCall,
}

impl ToolCallRequest {
    pub fn function(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: "function".to_string(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

/// Function-calling schema advertised to the completion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionDef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// What one completion round produced.
#[derive(Debug, Clone, Default)]
pub struct Completion {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCallRequest>,
}

impl Completion {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_message_serializes_without_tool_fields() {
        let message = ChatMessage::user("Hello");
        let wire = serde_json::to_value(&message).unwrap();
        assert_eq!(wire["role"], "user");
        assert_eq!(wire["content"], "Hello");
        assert!(wire.get("tool_calls").is_none());
        assert!(wire.get("tool_call_id").is_none());
        assert!(wire.get("name").is_none());
    }

    #[test]
    fn assistant_with_calls_defaults_empty_content() {
        let call = ToolCallRequest::function("1", "search_products", r#"{"query":"monitor"}"#);
        let message = ChatMessage::assistant_with_calls(None, vec![call]);
        let wire = serde_json::to_value(&message).unwrap();
        assert_eq!(wire["content"], "");
        assert_eq!(wire["tool_calls"][0]["type"], "function");
        assert_eq!(wire["tool_calls"][0]["function"]["name"], "search_products");
        assert_eq!(
            wire["tool_calls"][0]["function"]["arguments"],
            r#"{"query":"monitor"}"#
        );
    }

    #[test]
    fn tool_message_carries_call_id_and_name() {
        let message = ChatMessage::tool("call_1", "search_products", "3 monitors found");
        let wire = serde_json::to_value(&message).unwrap();
        assert_eq!(wire["role"], "tool");
        assert_eq!(wire["tool_call_id"], "call_1");
        assert_eq!(wire["name"], "search_products");
        assert_eq!(wire["content"], "3 monitors found");
    }

    #[test]
    fn tool_call_request_round_trips() {
        let wire = serde_json::json!({
            "id": "call_abc",
            "type": "function",
            "function": { "name": "get_order", "arguments": "{\"order_id\": 12}" }
        });
        let parsed: ToolCallRequest = serde_json::from_value(wire).unwrap();
        assert_eq!(parsed.id, "call_abc");
        assert_eq!(parsed.function.name, "get_order");
        assert_eq!(parsed.function.arguments, "{\"order_id\": 12}");
    }
}
