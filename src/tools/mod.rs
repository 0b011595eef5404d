pub mod endpoints;
pub mod params;
pub mod positions;
pub mod registry;
pub mod request;

pub use endpoints::{EndpointSpec, ENDPOINTS};
pub use registry::ToolRegistry;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Standard tool request format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// MCP Tool Definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Standard tool response format: a text payload or an error text, never both
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub text: String,
    pub is_error: bool,
}

impl ToolResponse {
    pub fn success(text: String) -> Self {
        ToolResponse {
            text,
            is_error: false,
        }
    }

    pub fn error(message: String) -> Self {
        ToolResponse {
            text: message,
            is_error: true,
        }
    }

    /// Render as an MCP `tools/call` result
    pub fn to_call_result(&self) -> Value {
        json!({
            "content": [{ "type": "text", "text": self.text }],
            "isError": self.is_error
        })
    }
}
