//! Tool dispatch seam.
//!
//! The conversation loop talks to tools through this trait so tests can
//! substitute a recording host. The real implementation relays calls to
//! the MCP client and extracts the result text.

use crate::{Error, Result};
use serde_json::Value;
use std::future::Future;

/// Trait for tool execution hosts.
///
/// This is the boundary between the conversation loop and side effects.
/// A call returns the text content of the invocation's result.
pub trait ToolHost: Send {
    fn call(
        &mut self,
        name: &str,
        arguments: Option<Value>,
    ) -> impl Future<Output = Result<String>> + Send;
}

impl ToolHost for mcp::Client {
    async fn call(&mut self, name: &str, arguments: Option<Value>) -> Result<String> {
        let result = self.call_tool(name, arguments).await?;

        // Only the first content item's text feeds back into the
        // conversation; anything else the server returns is ignored.
        let text = result
            .text()
            .ok_or_else(|| Error::Tool(format!("tool '{name}' returned no text content")))?;

        Ok(text.to_string())
    }
}
