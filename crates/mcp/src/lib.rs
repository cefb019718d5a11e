//! MCP (Model Context Protocol) client library.
//!
//! This crate provides a client for communicating with MCP servers over the
//! SSE transport: a long-lived event stream for server-to-client messages
//! and an HTTP POST endpoint for client-to-server messages.
//!
//! # Example
//!
//! ```no_run
//! use mcp::Client;
//!
//! # async fn example() -> mcp::Result<()> {
//! let mut client = Client::connect("http://localhost:8000/sse").await?;
//! client.initialize().await?;
//!
//! for tool in client.list_tools().await? {
//!     println!("Tool: {}", tool.name);
//! }
//!
//! let result = client
//!     .call_tool("get_weather", Some(serde_json::json!({"city": "LA"})))
//!     .await?;
//! println!("{:?}", result.text());
//!
//! client.close();
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod protocol;
mod sse;

pub use client::Client;
pub use error::{Error, Result};
pub use sse::MAX_EVENT_SIZE;
pub use protocol::{
    CallToolParams, CallToolResult, ClientInfo, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult, RequestId, ServerInfo, Tool, ToolContent,
};
