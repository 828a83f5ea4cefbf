use thiserror::Error;

pub type Result<T> = std::result::Result<T, AtlasError>;

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("Tool call failed: {0}")]
    ToolError(String),

    #[error("Invalid arguments for tool {tool}: {reason}")]
    InvalidToolArguments { tool: String, reason: String },
}

impl AtlasError {
    pub fn api_error(msg: impl Into<String>) -> Self {
        AtlasError::ApiError(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        AtlasError::ConfigError(msg.into())
    }

    pub fn protocol_error(msg: impl Into<String>) -> Self {
        AtlasError::ProtocolError(msg.into())
    }

    pub fn tool_error(msg: impl Into<String>) -> Self {
        AtlasError::ToolError(msg.into())
    }
}
