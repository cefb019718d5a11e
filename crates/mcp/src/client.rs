//! MCP session lifecycle over the SSE transport.
//!
//! The transport is asymmetric: the client holds a long-lived GET request
//! whose body is an SSE stream, and POSTs JSON-RPC messages to an endpoint
//! URL the server announces as the stream's first event. Responses come
//! back over the SSE stream, not the POST response body.

use reqwest::Url;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, RequestId, Tool,
};
use crate::sse::EventStream;

/// A client session with an MCP server.
///
/// All methods take `&mut self`: the session is a single logical thread of
/// control and requests are strictly sequential. Dropping the client closes
/// the SSE stream and with it the session, so the connection is released on
/// every exit path.
pub struct Client {
    http: reqwest::Client,
    endpoint: Url,
    events: EventStream,
    next_id: i64,
    initialized: bool,
    server_info: Option<InitializeResult>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint)
            .field("next_id", &self.next_id)
            .field("initialized", &self.initialized)
            .field("server_info", &self.server_info)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Open the SSE stream and resolve the message endpoint.
    ///
    /// The server's first event must be an `endpoint` event carrying the
    /// URL (usually relative) to POST subsequent messages to.
    pub async fn connect(url: &str) -> Result<Self> {
        let base = Url::parse(url).map_err(|e| Error::Endpoint(e.to_string()))?;

        let http = reqwest::Client::new();
        let response = http
            .get(base.clone())
            .header("accept", "text/event-stream")
            .send()
            .await
            .map_err(|e| Error::Connect(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Connect(format!(
                "server returned {}",
                response.status()
            )));
        }

        let mut events = EventStream::new(response);

        let first = events.next_event().await?;
        if first.event != "endpoint" {
            return Err(Error::InvalidResponse(format!(
                "expected endpoint event, got '{}'",
                first.event
            )));
        }

        let endpoint = resolve_endpoint(&base, &first.data)?;

        Ok(Self {
            http,
            endpoint,
            events,
            next_id: 1,
            initialized: false,
            server_info: None,
        })
    }

    /// Perform the capability handshake (must be called before other
    /// operations).
    pub async fn initialize(&mut self) -> Result<()> {
        let params = InitializeParams::default();
        let result: InitializeResult = self.request("initialize", Some(params)).await?;

        self.notify("notifications/initialized", None::<()>).await?;

        self.server_info = Some(result);
        self.initialized = true;
        Ok(())
    }

    /// Server info from the handshake.
    pub fn server_info(&self) -> Option<&InitializeResult> {
        self.server_info.as_ref()
    }

    /// List the tools the server exposes.
    pub async fn list_tools(&mut self) -> Result<Vec<Tool>> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }

        let result: ListToolsResult = self.request("tools/list", None::<()>).await?;
        Ok(result.tools)
    }

    /// Invoke a tool by name.
    ///
    /// The result is returned as the server sent it, `isError` flag and
    /// all; a failing tool's text content flows back to the caller like any
    /// other content.
    pub async fn call_tool(
        &mut self,
        name: &str,
        arguments: Option<Value>,
    ) -> Result<CallToolResult> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }

        let params = CallToolParams {
            name: name.to_string(),
            arguments,
        };

        self.request("tools/call", Some(params)).await
    }

    /// End the session, closing the SSE stream.
    pub fn close(self) {
        // Dropping the event stream closes the connection.
    }

    // --- Internal methods ---

    fn next_request_id(&mut self) -> RequestId {
        let id = self.next_id;
        self.next_id += 1;
        RequestId::Number(id)
    }

    async fn request<P, R>(&mut self, method: &str, params: Option<P>) -> Result<R>
    where
        P: serde::Serialize,
        R: serde::de::DeserializeOwned,
    {
        let id = self.next_request_id();
        let mut request = JsonRpcRequest::new(id.clone(), method);
        if let Some(p) = params {
            request = request.with_params(p);
        }

        self.post(&request).await?;

        let response = self.read_response(&id).await?;
        let result_value = response.into_result()?;
        let result: R = serde_json::from_value(result_value)
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;

        Ok(result)
    }

    async fn notify<P>(&mut self, method: &str, params: Option<P>) -> Result<()>
    where
        P: serde::Serialize,
    {
        // Notifications have no ID and get no response.
        let notification = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params.and_then(|p| serde_json::to_value(p).ok()),
        });

        self.post(&notification).await
    }

    async fn post(&mut self, message: &impl serde::Serialize) -> Result<()> {
        let body = serde_json::to_string(message)?;
        let response = self
            .http
            .post(self.endpoint.clone())
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Network(format!(
                "server returned {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn read_response(&mut self, expected_id: &RequestId) -> Result<JsonRpcResponse> {
        loop {
            let event = self.events.next_event().await?;

            if event.event != "message" {
                continue;
            }

            let response: JsonRpcResponse = serde_json::from_str(&event.data)
                .map_err(|e| Error::InvalidResponse(e.to_string()))?;

            if let Some(response) = match_response(response, expected_id)? {
                return Ok(response);
            }
        }
    }
}

/// Resolve the endpoint announced by the server against the SSE base URL.
fn resolve_endpoint(base: &Url, data: &str) -> Result<Url> {
    base.join(data.trim())
        .map_err(|e| Error::Endpoint(e.to_string()))
}

/// Accept a stream message as the response to `expected_id`.
///
/// Messages without an id are server notifications and yield `None`; a
/// response carrying a different id is a protocol violation.
fn match_response(
    response: JsonRpcResponse,
    expected_id: &RequestId,
) -> Result<Option<JsonRpcResponse>> {
    let Some(id) = response.id.clone() else {
        return Ok(None);
    };

    if id == *expected_id {
        Ok(Some(response))
    } else {
        Err(Error::InvalidResponse(format!(
            "response ID mismatch: expected {expected_id:?}, got {id:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn unconnected_client() -> Client {
        Client {
            http: reqwest::Client::new(),
            endpoint: url("http://localhost:8000/messages"),
            events: EventStream::from_stream(futures_util::stream::empty().boxed()),
            next_id: 1,
            initialized: false,
            server_info: None,
        }
    }

    #[test]
    fn endpoint_resolves_relative_to_base() {
        let base = url("http://localhost:8000/sse");
        let endpoint = resolve_endpoint(&base, "/messages?sessionId=abc").unwrap();
        assert_eq!(
            endpoint.as_str(),
            "http://localhost:8000/messages?sessionId=abc"
        );
    }

    #[test]
    fn endpoint_accepts_absolute_url() {
        let base = url("http://localhost:8000/sse");
        let endpoint = resolve_endpoint(&base, "http://localhost:9000/messages").unwrap();
        assert_eq!(endpoint.as_str(), "http://localhost:9000/messages");
    }

    #[test]
    fn matching_response_id_is_accepted() {
        let response: JsonRpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":{}}"#).unwrap();
        let accepted = match_response(response, &RequestId::Number(1)).unwrap();
        assert!(accepted.is_some());
    }

    #[test]
    fn mismatched_response_id_is_rejected() {
        let response: JsonRpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":7,"result":{}}"#).unwrap();
        let err = match_response(response, &RequestId::Number(1)).unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[test]
    fn notifications_are_skipped() {
        let response: JsonRpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"notifications/message"}"#).unwrap();
        let accepted = match_response(response, &RequestId::Number(1)).unwrap();
        assert!(accepted.is_none());
    }

    #[tokio::test]
    async fn connect_failure_is_fatal() {
        // Port 9 (discard) should refuse the connection.
        let err = Client::connect("http://127.0.0.1:9/sse").await.unwrap_err();
        assert!(matches!(err, Error::Connect(_)));
    }

    #[tokio::test]
    async fn connect_rejects_malformed_url() {
        let err = Client::connect("not a url").await.unwrap_err();
        assert!(matches!(err, Error::Endpoint(_)));
    }

    #[tokio::test]
    async fn operations_require_initialize() {
        let mut client = unconnected_client();
        assert!(client.server_info().is_none());

        let err = client.list_tools().await.unwrap_err();
        assert!(matches!(err, Error::NotInitialized));

        let err = client.call_tool("get_weather", None).await.unwrap_err();
        assert!(matches!(err, Error::NotInitialized));
    }
}
