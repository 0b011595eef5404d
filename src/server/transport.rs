use serde_json::Value;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::mcp::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpServer};

/// Serve line-delimited JSON-RPC until `reader` reaches EOF.
///
/// Each request runs on its own task, so responses may be written out of
/// order; clients correlate them by `id`. Requests still in flight at EOF
/// are allowed to finish before this returns.
pub async fn serve<R, W>(server: McpServer, mut reader: R, writer: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    let writer_task = tokio::spawn(write_responses(writer, rx));

    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let line = trim_line(&buf);
        if line.is_empty() {
            continue;
        }

        match parse_request(line) {
            Ok(request) => {
                info!("Received request: {} (id: {:?})", request.method, request.id);

                let server = server.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Some(response) = server.handle_request(request).await {
                        send(&tx, &response);
                    }
                });
            }
            Err(response) => send(&tx, &response),
        }
    }

    debug!("Input closed, waiting for in-flight requests");
    drop(tx);
    writer_task.await.map_err(io::Error::other)?
}

/// Decode one line. Undecodable bytes or bad JSON get `-32700`; JSON that is
/// not a request gets `-32600` with its `id` echoed when present.
fn parse_request(line: &[u8]) -> Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_slice(line).map_err(|e| {
        error!("Failed to parse JSON-RPC message: {}", e);
        let mut err = JsonRpcError::new(JsonRpcError::PARSE_ERROR, "Parse error".to_string());
        err.data = Some(Value::String(e.to_string()));
        JsonRpcResponse::failure(Value::Null, err)
    })?;

    let id = value.get("id").cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| {
        error!("Invalid JSON-RPC request: {}", e);
        let mut err =
            JsonRpcError::new(JsonRpcError::INVALID_REQUEST, "Invalid Request".to_string());
        err.data = Some(Value::String(e.to_string()));
        JsonRpcResponse::failure(id, err)
    })
}

fn trim_line(line: &[u8]) -> &[u8] {
    let start = line
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(line.len());
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &line[start..end]
}

fn send(tx: &mpsc::UnboundedSender<String>, response: &JsonRpcResponse) {
    match serde_json::to_string(response) {
        Ok(json) => {
            if tx.send(json).is_err() {
                error!("Response writer closed, dropping response {}", response.id);
            }
        }
        Err(e) => error!("Failed to serialize response {}: {}", response.id, e),
    }
}

async fn write_responses<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<String>) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = rx.recv().await {
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    writer.shutdown().await
}
