pub mod error;
pub mod config;
pub mod mcp;
pub mod llm;
pub mod chat;

pub use error::{AtlasError, Result};
pub use config::AtlasConfig;
pub use chat::ChatContext;
