use serde_json::json;

use crate::mcp::dto::ToolDescriptor;

use super::dto::{FunctionDef, FunctionSchema};

/// Project MCP tool descriptors into function-calling schemas.
///
/// Order-preserving and one-to-one. Duplicate names pass through untouched;
/// the completion service layer owns any deduplication policy.
pub fn to_function_schemas(tools: &[ToolDescriptor]) -> Vec<FunctionSchema> {
    tools
        .iter()
        .map(|tool| FunctionSchema {
            kind: "function".to_string(),
            function: FunctionDef {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.input_schema.clone().unwrap_or_else(|| {
                    json!({
                        "type": "object",
                        "properties": {}
                    })
                }),
            },
        })
        .collect()
}
