use crate::error::{AtlasError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasConfig {
    pub mcp: McpConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpConfig {
    pub server_url: String,
    pub timeout_secs: u64,
}

impl McpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            mcp: McpConfig {
                server_url: "http://127.0.0.1:8080/rpc".to_string(),
                timeout_secs: 30,
            },
            llm: LlmConfig {
                api_key: String::new(),
                model: "gpt-4o-mini".to_string(),
                base_url: "https://api.openai.com/v1".to_string(),
            },
        }
    }
}

impl AtlasConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        config.mcp.server_url = std::env::var("MCP_SERVER_URL")
            .map_err(|_| AtlasError::config_error("MCP_SERVER_URL is not set"))?;

        if let Ok(timeout) = std::env::var("ATLAS_HTTP_TIMEOUT_SECS") {
            config.mcp.timeout_secs = timeout
                .parse()
                .map_err(|_| AtlasError::config_error("Invalid ATLAS_HTTP_TIMEOUT_SECS"))?;
        }

        config.llm.api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AtlasError::config_error("OPENAI_API_KEY is not set"))?;

        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            config.llm.model = model;
        }

        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.llm.base_url = base_url;
            }
        }

        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AtlasError::config_error(format!("Failed to read config file: {}", e)))?;

        let config: AtlasConfig = toml::from_str(&content)
            .map_err(|e| AtlasError::config_error(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }
}
