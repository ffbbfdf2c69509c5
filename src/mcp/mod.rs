//! Model Context Protocol (MCP) client for the tool server connection.

pub mod client;
pub mod schema;
pub mod transport;

pub use client::{McpClient, McpToolCallResult};
pub use schema::McpToolSchema;
pub use transport::StdioTransport;
