use hyperliquid_mcp_server::server::serve;
use hyperliquid_mcp_server::{Config, McpServer};
use std::net::SocketAddr;
use tokio::io::BufReader;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // stdout carries the protocol, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();

    info!("Starting Hyperliquid MCP Server...");

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let mcp_server = McpServer::new(&config).map_err(|e| {
        error!("Failed to initialize MCP server: {}", e);
        e
    })?;

    match config.listen_addr {
        Some(addr) => serve_tcp(mcp_server, addr).await,
        None => {
            info!("Hyperliquid MCP server running on stdio");
            serve(
                mcp_server,
                BufReader::new(tokio::io::stdin()),
                tokio::io::stdout(),
            )
            .await?;
            info!("stdin closed, shutting down");
            Ok(())
        }
    }
}

async fn serve_tcp(mcp_server: McpServer, addr: SocketAddr) -> eyre::Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    info!("MCP server listening on {}", addr);

    loop {
        let (socket, peer_addr) = listener.accept().await?;
        let mcp_server = mcp_server.clone();
        info!("Accepted connection from {}", peer_addr);

        tokio::spawn(async move {
            let (reader, writer) = socket.into_split();
            if let Err(e) = serve(mcp_server, BufReader::new(reader), writer).await {
                error!("Error handling connection from {}: {}", peer_addr, e);
            }
        });
    }
}
