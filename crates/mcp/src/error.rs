//! MCP client error types.

use crate::protocol::JsonRpcError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to connect: {0}")]
    Connect(String),

    #[error("invalid endpoint: {0}")]
    Endpoint(String),

    #[error("session not initialized")]
    NotInitialized,

    #[error("server closed the event stream")]
    ServerClosed,

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to serialize request: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON-RPC error: {0}")]
    JsonRpc(#[from] JsonRpcError),

    #[error("event too large: {size} bytes (max {max})")]
    EventTooLarge { size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
