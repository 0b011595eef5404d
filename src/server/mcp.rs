use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{HyperliquidError, Result};
use crate::gateway::GatewayClient;
use crate::tools::{ToolDefinition, ToolRegistry, ToolRequest};

pub const SERVER_NAME: &str = "hyperliquid-mcp";
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";
/// Protocol revisions this server can speak; anything else gets the default.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2024-11-05", "2025-03-26", "2025-06-18"];

/// JSON-RPC 2.0 Request format. A missing `id` marks a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 Response format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    pub fn new(code: i32, message: String) -> Self {
        JsonRpcError {
            code,
            message,
            data: None,
        }
    }
}

impl From<HyperliquidError> for JsonRpcError {
    fn from(err: HyperliquidError) -> Self {
        let code = match err {
            HyperliquidError::ToolNotFound(_) => JsonRpcError::METHOD_NOT_FOUND,
            HyperliquidError::InvalidArguments(_) => JsonRpcError::INVALID_PARAMS,
            _ => JsonRpcError::INTERNAL_ERROR,
        };
        JsonRpcError::new(code, err.to_string())
    }
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn failure(id: Value, error: JsonRpcError) -> Self {
        JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

/// MCP Server exposing the Hyperliquid info tools
#[derive(Clone)]
pub struct McpServer {
    registry: ToolRegistry,
}

impl McpServer {
    pub fn new(config: &Config) -> Result<Self> {
        let gateway = GatewayClient::new(&config.api_url)?;
        info!("Initializing MCP server with API URL: {}", gateway.base_url());
        let registry = ToolRegistry::new(gateway);

        info!("Registered {} tools", registry.len());
        Ok(McpServer { registry })
    }

    /// Get tool definitions (MCP spec)
    pub fn get_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }

    /// Handle a JSON-RPC message. Notifications get no response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(
            "Handling MCP request: {} with params: {}",
            request.method, request.params
        );

        let Some(id) = request.id else {
            debug!("Notification received: {}", request.method);
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize(&request.params)),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tool_call(request.params).await,
            "ping" => Ok(json!({})),
            _ => Err(JsonRpcError::new(
                JsonRpcError::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            )),
        };

        Some(match response {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => JsonRpcResponse::failure(id, err),
        })
    }

    fn handle_initialize(&self, params: &Value) -> Value {
        let protocol_version = params
            .get("protocolVersion")
            .and_then(|v| v.as_str())
            .filter(|v| SUPPORTED_PROTOCOL_VERSIONS.contains(v))
            .unwrap_or(DEFAULT_PROTOCOL_VERSION);

        json!({
            "protocolVersion": protocol_version,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    fn handle_tools_list(&self) -> std::result::Result<Value, JsonRpcError> {
        let tools = serde_json::to_value(self.get_tool_definitions()).map_err(|e| {
            JsonRpcError::new(JsonRpcError::INTERNAL_ERROR, format!("Internal error: {}", e))
        })?;
        Ok(json!({ "tools": tools }))
    }

    async fn handle_tool_call(&self, params: Value) -> std::result::Result<Value, JsonRpcError> {
        let call: ToolRequest = serde_json::from_value(params).map_err(|e| {
            JsonRpcError::new(
                JsonRpcError::INVALID_PARAMS,
                format!("Invalid tools/call params: {}", e),
            )
        })?;

        info!("Calling tool {}", call.name);
        let response = self.registry.execute(&call.name, &call.arguments).await?;
        Ok(response.to_call_result())
    }
}
