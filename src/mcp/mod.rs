pub mod dto;
pub mod transport;
pub mod session;

pub use dto::{McpError, McpRequest, McpResponse, ToolDescriptor, ToolOutput};
pub use session::McpSession;
pub use transport::HttpTransport;
