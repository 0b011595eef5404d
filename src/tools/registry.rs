use serde_json::Value;
use tracing::{debug, error, info};

use crate::error::{HyperliquidError, Result};
use crate::gateway::GatewayClient;
use crate::tools::endpoints::{self, EndpointSpec, ENDPOINTS};
use crate::tools::request::build_body;
use crate::tools::{ToolDefinition, ToolResponse};

/// Table-driven dispatcher over [`ENDPOINTS`].
///
/// Holds no per-call state; concurrent calls only share the gateway client.
#[derive(Clone)]
pub struct ToolRegistry {
    gateway: GatewayClient,
}

impl ToolRegistry {
    pub fn new(gateway: GatewayClient) -> Self {
        ToolRegistry { gateway }
    }

    pub fn get(&self, name: &str) -> Option<&'static EndpointSpec> {
        endpoints::find(name)
    }

    pub fn len(&self) -> usize {
        ENDPOINTS.len()
    }

    pub fn is_empty(&self) -> bool {
        ENDPOINTS.is_empty()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        ENDPOINTS
            .iter()
            .map(|spec| ToolDefinition {
                name: spec.name.to_string(),
                description: spec.description.to_string(),
                input_schema: spec.input_schema(),
            })
            .collect()
    }

    /// Run a tool and return its pretty-printed output, propagating every failure.
    pub async fn call(&self, name: &str, args: &Value) -> Result<String> {
        let spec = self
            .get(name)
            .ok_or_else(|| HyperliquidError::ToolNotFound(name.to_string()))?;
        let body = build_body(spec, args)?;
        self.run(spec, &body).await
    }

    /// Run a tool behind the uniform failure boundary.
    ///
    /// Unknown tools and invalid arguments are returned as `Err` so the host
    /// can reject the call. Anything that fails after that point becomes an
    /// error [`ToolResponse`] naming the tool.
    pub async fn execute(&self, name: &str, args: &Value) -> Result<ToolResponse> {
        let spec = self
            .get(name)
            .ok_or_else(|| HyperliquidError::ToolNotFound(name.to_string()))?;
        let body = build_body(spec, args)?;

        match self.run(spec, &body).await {
            Ok(text) => {
                info!("Tool {} completed", spec.name);
                Ok(ToolResponse::success(text))
            }
            Err(e) => {
                error!("Tool {} failed: {}", spec.name, e);
                Ok(ToolResponse::error(format!("Error fetching {}: {}", spec.name, e)))
            }
        }
    }

    async fn run(&self, spec: &EndpointSpec, body: &Value) -> Result<String> {
        debug!("Dispatching {} as {}", spec.name, spec.discriminator);

        let raw = self.gateway.send(spec.endpoint, body).await?;
        let shaped = spec.shape.apply(raw)?;

        serde_json::to_string_pretty(&shaped)
            .map_err(|e| HyperliquidError::Serialization(e.to_string()))
    }
}
