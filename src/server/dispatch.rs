//! Routes JSON-RPC messages to MCP methods.

use super::protocol::{
    DEFAULT_PROTOCOL_VERSION, ErrorCode, JSONRPC_VERSION, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ServerInfo, ToolCallParams,
};
use crate::tool::domain::{CallContext, RawCall};
use crate::tool::services::ToolRegistry;
use mockable::Clock;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, warn};

/// MCP method handler over a frozen tool registry.
#[derive(Debug)]
pub struct McpServer<C>
where
    C: Clock + Send + Sync,
{
    registry: ToolRegistry,
    clock: Arc<C>,
    info: ServerInfo,
}

impl<C> McpServer<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a server reporting the crate's name and version.
    #[must_use]
    pub fn new(registry: ToolRegistry, clock: Arc<C>) -> Self {
        Self {
            registry,
            clock,
            info: ServerInfo::default(),
        }
    }

    /// Overrides the reported server identity.
    #[must_use]
    pub fn with_info(mut self, info: ServerInfo) -> Self {
        self.info = info;
        self
    }

    /// Returns the tool registry.
    #[must_use]
    pub const fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handles one raw line of input, answering undecodable text with a
    /// parse error.
    pub async fn handle_bytes(&self, line: &[u8]) -> Option<JsonRpcResponse> {
        match std::str::from_utf8(line) {
            Ok(text) => self.handle_line(text).await,
            Err(err) => {
                warn!(error = %err, "discarding JSON-RPC message that is not UTF-8");
                Some(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::new(ErrorCode::ParseError).with_data(err.to_string()),
                ))
            }
        }
    }

    /// Handles one line of input.
    ///
    /// Returns `None` for notifications, which never receive a response.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let message: Value = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(err) => {
                warn!(error = %err, "discarding malformed JSON-RPC message");
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::new(ErrorCode::ParseError).with_data(err.to_string()),
                ));
            }
        };
        self.handle_message(message).await
    }

    /// Handles one decoded message.
    pub async fn handle_message(&self, message: Value) -> Option<JsonRpcResponse> {
        let fallback_id = message.get("id").cloned().unwrap_or(Value::Null);
        let request = match serde_json::from_value::<JsonRpcRequest>(message) {
            Ok(request) if request.jsonrpc == JSONRPC_VERSION => request,
            Ok(_) => {
                return Some(JsonRpcResponse::failure(
                    fallback_id,
                    JsonRpcError::new(ErrorCode::InvalidRequest)
                        .with_data("jsonrpc must be \"2.0\""),
                ));
            }
            Err(err) => {
                return Some(JsonRpcResponse::failure(
                    fallback_id,
                    JsonRpcError::new(ErrorCode::InvalidRequest).with_data(err.to_string()),
                ));
            }
        };

        let Some(id) = request.id.clone() else {
            debug!(method = %request.method, "received notification");
            return None;
        };
        Some(self.handle_request(id, request).await)
    }

    async fn handle_request(&self, id: Value, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!(method = %request.method, "handling request");
        match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, self.initialize(request.params.as_ref())),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => match serde_json::to_value(self.registry.descriptors()) {
                Ok(tools) => JsonRpcResponse::success(id, json!({ "tools": tools })),
                Err(err) => internal_error(id, &err),
            },
            "tools/call" => self.call_tool(id, request.params).await,
            other => JsonRpcResponse::failure(
                id,
                JsonRpcError::new(ErrorCode::MethodNotFound).with_data(other),
            ),
        }
    }

    fn initialize(&self, params: Option<&Value>) -> Value {
        let protocol_version = params
            .and_then(|value| value.get("protocolVersion"))
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_PROTOCOL_VERSION);
        json!({
            "protocolVersion": protocol_version,
            "capabilities": { "tools": { "listChanged": false } },
            "serverInfo": self.info,
        })
    }

    async fn call_tool(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let parsed = params
            .ok_or_else(|| "missing params".to_owned())
            .and_then(|value| {
                serde_json::from_value::<ToolCallParams>(value).map_err(|err| err.to_string())
            });
        let call_params = match parsed {
            Ok(call_params) => call_params,
            Err(reason) => {
                return JsonRpcResponse::failure(
                    id,
                    JsonRpcError::new(ErrorCode::InvalidParams).with_data(reason),
                );
            }
        };

        let context = CallContext::new(&*self.clock)
            .with_request_id(id.clone())
            .with_meta(call_params.meta.unwrap_or_default());
        let result = self
            .registry
            .dispatch(RawCall::new(call_params.name, call_params.arguments, context))
            .await;
        match serde_json::to_value(result) {
            Ok(encoded) => JsonRpcResponse::success(id, encoded),
            Err(err) => internal_error(id, &err),
        }
    }
}

fn internal_error(id: Value, err: &serde_json::Error) -> JsonRpcResponse {
    JsonRpcResponse::failure(
        id,
        JsonRpcError::new(ErrorCode::InternalError).with_data(err.to_string()),
    )
}
