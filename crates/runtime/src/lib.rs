//! Skiff runtime — conversation loop and chat backend.
//!
//! This crate wires a chat-completion model to an MCP tool server: it
//! adapts the server's tool descriptors into the model's function-calling
//! schema, and drives the relay loop that feeds tool results back into the
//! conversation.
//!
//! # Overview
//!
//! The runtime is organized around these concepts:
//!
//! - **Conversation**: an append-only message history driven as a state
//!   machine (awaiting the model, dispatching a tool-call batch, done).
//! - **ChatBackend**: a trait abstracting the chat model (Ollama here).
//! - **ToolHost**: a trait abstracting tool dispatch, implemented for the
//!   MCP client.
//! - **schema::adapt**: the tool-descriptor-to-function-schema adapter.
//!
//! # Example
//!
//! ```ignore
//! use runtime::{Conversation, OllamaBackend, schema};
//!
//! # async fn example() -> runtime::Result<()> {
//! let mut client = mcp::Client::connect("http://localhost:8000/sse").await?;
//! client.initialize().await?;
//!
//! let tools = client.list_tools().await?;
//! let schemas = tools.iter().map(schema::adapt).collect::<Result<Vec<_>, _>>()?;
//!
//! let backend = OllamaBackend::new("qwen2.5");
//! let mut conversation =
//!     Conversation::new(backend, schemas, "How is the weather in LA, California?");
//! conversation.run(&mut client).await?;
//! # Ok(())
//! # }
//! ```

mod backend;
mod error;
pub mod schema;
mod session;
mod tools;

pub use backend::{ChatBackend, FunctionCall, Message, OllamaBackend, Role, ToolCall};
pub use error::{Error, Result};
pub use schema::ToolSchema;
pub use session::Conversation;
pub use tools::ToolHost;
