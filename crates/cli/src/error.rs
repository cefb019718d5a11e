//! CLI error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// An error from the MCP client (connection, handshake, tool calls).
    #[error(transparent)]
    Mcp(#[from] mcp::Error),

    /// An error from the runtime layer (model calls, schema adaptation).
    #[error(transparent)]
    Runtime(#[from] runtime::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
