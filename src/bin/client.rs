use serde_json::{json, Value};
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

type Reader = BufReader<OwnedReadHalf>;
type Writer = OwnedWriteHalf;

const DEFAULT_ADDR: &str = "127.0.0.1:8080";

#[tokio::main]
async fn main() -> eyre::Result<()> {
    println!("Hyperliquid MCP Server - Test Client v{}\n", env!("CARGO_PKG_VERSION"));

    // Server must be started with MCP_LISTEN_ADDR set
    let addr = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("MCP_LISTEN_ADDR").ok())
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());
    println!("Connecting to server at {}...", addr);

    let socket = TcpStream::connect(&addr).await?;
    let (reader, writer) = socket.into_split();
    let reader = BufReader::new(reader);

    println!("Connected.\n");

    let mut client = TestClient::new(reader, writer);
    client.initialize().await?;

    loop {
        println!("\nAvailable Commands:");
        println!("  1. tools/list  - List available tools");
        println!("  2. tools/call  - Call a tool with JSON arguments");
        println!("  3. positions   - Shortcut for the positions tool");
        println!("  4. exit        - Close connection");
        let choice = prompt("\nEnter command number (1-4): ")?;

        match choice.as_str() {
            "1" => client.list_tools().await?,
            "2" => client.call_tool().await?,
            "3" => client.positions().await?,
            "4" => {
                println!("\nGoodbye!");
                break;
            }
            _ => println!("Invalid choice. Please enter 1-4."),
        }
    }

    Ok(())
}

fn prompt(label: &str) -> eyre::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

struct TestClient {
    reader: Reader,
    writer: Writer,
    request_id: i64,
}

impl TestClient {
    fn new(reader: Reader, writer: Writer) -> Self {
        TestClient {
            reader,
            writer,
            request_id: 1,
        }
    }

    async fn send_request(&mut self, method: &str, params: Value) -> eyre::Result<Value> {
        let request = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": self.request_id
        });
        self.request_id += 1;

        println!("\n-> {}", serde_json::to_string_pretty(&request)?);
        self.writer
            .write_all(serde_json::to_string(&request)?.as_bytes())
            .await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;

        let mut response_line = String::new();
        if self.reader.read_line(&mut response_line).await? == 0 {
            eyre::bail!("server closed the connection");
        }

        let response: Value = serde_json::from_str(&response_line)?;
        if let Some(error) = response.get("error") {
            println!(
                "\n<- Error: {}",
                error.get("message").unwrap_or(&Value::Null)
            );
        }
        Ok(response)
    }

    async fn notify(&mut self, method: &str) -> eyre::Result<()> {
        let notification = json!({ "jsonrpc": "2.0", "method": method });
        self.writer
            .write_all(serde_json::to_string(&notification)?.as_bytes())
            .await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn initialize(&mut self) -> eyre::Result<()> {
        let response = self
            .send_request(
                "initialize",
                json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": { "name": "mcp-client", "version": env!("CARGO_PKG_VERSION") }
                }),
            )
            .await?;
        println!("<- {}", serde_json::to_string_pretty(&response["result"])?);
        self.notify("notifications/initialized").await
    }

    async fn list_tools(&mut self) -> eyre::Result<()> {
        let response = self.send_request("tools/list", json!({})).await?;
        let tools = response["result"]["tools"].as_array().cloned().unwrap_or_default();

        println!("\n<- {} tools:", tools.len());
        for tool in tools {
            let required = tool["inputSchema"]["required"]
                .as_array()
                .map(|r| {
                    r.iter()
                        .filter_map(|v| v.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            println!(
                "  {:<26} [{}] {}",
                tool["name"].as_str().unwrap_or_default(),
                required,
                tool["description"].as_str().unwrap_or_default()
            );
        }
        Ok(())
    }

    async fn call_tool(&mut self) -> eyre::Result<()> {
        let name = prompt("\nTool name (e.g. all-mids): ")?;
        let raw_args = prompt("Arguments as JSON (press Enter for none): ")?;

        let arguments: Value = if raw_args.is_empty() {
            json!({})
        } else {
            match serde_json::from_str(&raw_args) {
                Ok(args) => args,
                Err(e) => {
                    println!("Invalid JSON: {}", e);
                    return Ok(());
                }
            }
        };

        self.print_call(&name, arguments).await
    }

    async fn positions(&mut self) -> eyre::Result<()> {
        let user = prompt("\nEnter wallet address (0x...): ")?;
        self.print_call("positions", json!({ "user": user })).await
    }

    async fn print_call(&mut self, name: &str, arguments: Value) -> eyre::Result<()> {
        let response = self
            .send_request("tools/call", json!({ "name": name, "arguments": arguments }))
            .await?;

        let result = &response["result"];
        if result.is_null() {
            return Ok(());
        }
        if result["isError"] == json!(true) {
            println!("\n<- Tool error:");
        } else {
            println!("\n<- Result:");
        }
        if let Some(content) = result["content"].as_array() {
            for item in content {
                println!("{}", item["text"].as_str().unwrap_or_default());
            }
        }
        Ok(())
    }
}
