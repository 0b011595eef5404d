use thiserror::Error;

#[derive(Error, Debug)]
pub enum HyperliquidError {
    #[error("upstream HTTP error: status {status}")]
    UpstreamHttp { status: u16 },

    #[error("upstream returned invalid JSON: {0}")]
    UpstreamParse(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("tool not found: {0}")]
    ToolNotFound(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, HyperliquidError>;
