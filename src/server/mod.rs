//! MCP server: JSON-RPC routing and the stdio transport.

mod dispatch;
pub mod protocol;
mod stdio;

pub use dispatch::McpServer;
pub use stdio::{TransportError, serve, serve_stdio};
