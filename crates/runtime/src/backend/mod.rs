//! Chat backend abstraction.
//!
//! Provides a trait for chat-completion backends plus the message types
//! exchanged with them, so the conversation loop can be exercised against
//! scripted backends in tests.

mod ollama;

pub use ollama::OllamaBackend;

use crate::Result;
use crate::schema::ToolSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;

/// Role of a message participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// A message in the conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// A tool-role message carrying one invocation's result text.
    pub fn tool(content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Trait for chat-completion backends.
///
/// Implementations handle the specifics of communicating with a model
/// endpoint. A call submits the full message history plus the tool
/// offerings and returns the assistant's next message, which may carry
/// tool calls.
pub trait ChatBackend: Send + Sync {
    fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
    ) -> impl Future<Output = Result<Message>> + Send;
}
