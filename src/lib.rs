pub mod config;
pub mod error;
pub mod gateway;
pub mod server;
pub mod tools;

pub use config::Config;
pub use error::{HyperliquidError, Result};
pub use gateway::GatewayClient;
pub use server::McpServer;
pub use tools::ToolRegistry;
