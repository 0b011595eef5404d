use crate::error::{HyperliquidError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;

pub const DEFAULT_API_URL: &str = "https://api.hyperliquid.xyz";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_url: String,
    /// Serve over TCP on this address instead of stdio.
    pub listen_addr: Option<SocketAddr>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let api_url =
            env::var("HYPERLIQUID_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let listen_addr = match env::var("MCP_LISTEN_ADDR") {
            Ok(raw) => Some(parse_listen_addr(&raw)?),
            Err(_) => None,
        };

        Ok(Config {
            api_url,
            listen_addr,
        })
    }

    pub fn from_url(api_url: String) -> Self {
        Config {
            api_url,
            listen_addr: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::from_url(DEFAULT_API_URL.to_string())
    }
}

fn parse_listen_addr(raw: &str) -> Result<SocketAddr> {
    raw.trim()
        .parse::<SocketAddr>()
        .map_err(|e| HyperliquidError::Config(format!("Invalid MCP_LISTEN_ADDR {}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_url() {
        let config = Config::from_url("https://api.hyperliquid-testnet.xyz".to_string());
        assert_eq!(config.api_url, "https://api.hyperliquid-testnet.xyz");
        assert!(config.listen_addr.is_none());
    }

    #[test]
    fn test_default_points_at_mainnet() {
        assert_eq!(Config::default().api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_parse_listen_addr() {
        let addr = parse_listen_addr("127.0.0.1:8080").unwrap();
        assert_eq!(addr.port(), 8080);
        assert!(parse_listen_addr("localhost").is_err());
    }
}
