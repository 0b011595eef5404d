pub mod mcp;
pub mod transport;

pub use mcp::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpServer};
pub use transport::serve;
