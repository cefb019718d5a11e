//! The conversation relay loop.

use serde_json::Value;

use crate::Result;
use crate::backend::{ChatBackend, FunctionCall, Message};
use crate::schema::ToolSchema;
use crate::tools::ToolHost;

/// Where the loop stands between I/O suspension points.
enum State {
    /// History submitted (or about to be); waiting on the model.
    AwaitingModel,
    /// The model requested tool calls; dispatch them in emitted order.
    Dispatching(Vec<crate::backend::ToolCall>),
    /// The model replied with plain text; the conversation is over.
    Done,
}

/// A conversation between one chat backend and one tool host.
///
/// The message history is append-only and strictly chronological. Each
/// turn submits the full history plus the full tool schema list; a reply
/// carrying tool calls appends one tool-role message per call, a plain
/// text reply appends the assistant message and ends the loop.
pub struct Conversation<B> {
    backend: B,
    tools: Vec<ToolSchema>,
    messages: Vec<Message>,
}

impl<B: ChatBackend> Conversation<B> {
    /// Seed a conversation with a single user message.
    pub fn new(backend: B, tools: Vec<ToolSchema>, prompt: impl Into<String>) -> Self {
        Self {
            backend,
            tools,
            messages: vec![Message::user(prompt)],
        }
    }

    /// The accumulated message history.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Drive the conversation until the model replies without tool calls.
    ///
    /// Tool calls within a batch run sequentially, each awaited before the
    /// next begins, and the history is resubmitted once per batch, after
    /// the whole batch has been dispatched. Any backend or host failure
    /// propagates immediately.
    pub async fn run<H: ToolHost>(&mut self, host: &mut H) -> Result<()> {
        let mut state = State::AwaitingModel;

        loop {
            state = match state {
                State::AwaitingModel => {
                    let reply = self.backend.chat(&self.messages, &self.tools).await?;

                    if !reply.content.is_empty() {
                        println!("Response: {}", reply.content);
                    }

                    if reply.tool_calls.is_empty() {
                        self.messages.push(reply);
                        State::Done
                    } else {
                        println!("Tool calls:");
                        State::Dispatching(reply.tool_calls)
                    }
                }
                State::Dispatching(batch) => {
                    for call in batch {
                        let FunctionCall { name, arguments } = call.function;
                        println!("Tool name: {name}");
                        println!("Arguments: {arguments}");

                        let arguments = match arguments {
                            Value::Null => None,
                            args => Some(args),
                        };
                        let output = host.call(&name, arguments).await?;

                        println!("Tool output: {output}");
                        self.messages.push(Message::tool(output));
                    }
                    State::AwaitingModel
                }
                State::Done => break,
            };
        }

        Ok(())
    }
}
