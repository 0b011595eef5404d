use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};
use url::Url;

use crate::error::{HyperliquidError, Result};

/// Request gateway for the upstream HTTP API.
///
/// Every call is exactly one POST round-trip: no retries, no timeout beyond
/// the transport default. The client is immutable once built and cheap to
/// clone, so concurrent tool calls share nothing but the transport.
#[derive(Clone)]
pub struct GatewayClient {
    inner: Arc<GatewayClientInner>,
}

struct GatewayClientInner {
    base_url: Url,
    http: reqwest::Client,
}

impl GatewayClient {
    /// Create a new gateway client rooted at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = base_url
            .parse::<Url>()
            .map_err(|_| HyperliquidError::Config(format!("Invalid API URL: {}", base_url)))?;

        if base_url.cannot_be_a_base() {
            return Err(HyperliquidError::Config(format!(
                "API URL cannot be used as a base: {}",
                base_url
            )));
        }

        // `Url::join` replaces the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        debug!("Gateway base URL: {}", base_url);

        Ok(GatewayClient {
            inner: Arc::new(GatewayClientInner {
                base_url,
                http: reqwest::Client::new(),
            }),
        })
    }

    /// Resolve the full URL for an upstream endpoint
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        self.inner
            .base_url
            .join(endpoint)
            .map_err(|e| HyperliquidError::Config(format!("Invalid endpoint {}: {}", endpoint, e)))
    }

    /// POST `body` as JSON to `{base}/{endpoint}` and return the parsed response.
    ///
    /// A non-success status fails with [`HyperliquidError::UpstreamHttp`]
    /// without reading the body; a body that is not JSON fails with
    /// [`HyperliquidError::UpstreamParse`].
    pub async fn send(&self, endpoint: &str, body: &Value) -> Result<Value> {
        let url = self.endpoint_url(endpoint)?;
        debug!("POST {} body={}", url, body);

        let response = self
            .inner
            .http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("Request to {} failed: {}", url, e);
                HyperliquidError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Upstream {} returned HTTP {}", url, status.as_u16());
            return Err(HyperliquidError::UpstreamHttp {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            error!("Failed to read response body from {}: {}", url, e);
            HyperliquidError::Network(e.to_string())
        })?;

        serde_json::from_slice(&bytes).map_err(|e| {
            error!("Upstream {} returned invalid JSON: {}", url, e);
            HyperliquidError::UpstreamParse(e.to_string())
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str()
    }
}
