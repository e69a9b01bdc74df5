//! MCP server implementation.

use super::dispatch::Gateway;
use super::protocol::*;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "spotify-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP server for spotify-mcp.
pub struct McpServer {
    gateway: Arc<Gateway>,
}

impl McpServer {
    /// Create a new MCP server.
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(&self) -> anyhow::Result<()> {
        info!("spotify-mcp MCP server starting on stdio");
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve newline-delimited JSON-RPC until `reader` reaches end of input.
    ///
    /// Each request runs in its own task so a slow Spotify call does not hold
    /// up the next request; responses are written in completion order. In-flight
    /// requests are drained before returning.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> anyhow::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

        let writer_task = tokio::spawn(async move {
            let mut writer = writer;
            while let Some(response) = rx.recv().await {
                let mut line = serde_json::to_vec(&response)?;
                line.push(b'\n');
                writer.write_all(&line).await?;
                writer.flush().await?;
            }
            Ok::<(), anyhow::Error>(())
        });

        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(req) => req,
                Err(e) => {
                    warn!("Failed to parse request: {}", e);
                    // The writer only stops once every sender is gone.
                    let _ = tx.send(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error"));
                    continue;
                }
            };

            let gateway = Arc::clone(&self.gateway);
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = handle_request(&gateway, request).await {
                    let _ = tx.send(response);
                }
            });
        }

        debug!("Input closed, waiting for in-flight requests");
        drop(tx);
        writer_task.await??;
        info!("spotify-mcp MCP server stopped");
        Ok(())
    }
}

/// Handle a single JSON-RPC message. Notifications produce no response.
async fn handle_request(gateway: &Gateway, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
    debug!(method = %request.method, "Handling request");

    if request.is_notification() {
        if !request.method.starts_with("notifications/") {
            debug!(method = %request.method, "Ignoring notification");
        }
        return None;
    }

    let response = match request.method.as_str() {
        "initialize" => handle_initialize(request.id),
        "ping" => JsonRpcResponse::success(request.id, json!({})),
        "tools/list" => handle_tools_list(gateway, request.id),
        "tools/call" => handle_tools_call(gateway, request.id, request.params).await,
        _ => JsonRpcResponse::error(
            request.id,
            METHOD_NOT_FOUND,
            &format!("Method not found: {}", request.method),
        ),
    };
    Some(response)
}

/// Handle initialize request.
fn handle_initialize(id: Option<Value>) -> JsonRpcResponse {
    let result = InitializeResult {
        protocol_version: PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: ToolsCapability {
                list_changed: false,
            },
        },
        server_info: ServerInfo {
            name: SERVER_NAME.to_string(),
            version: SERVER_VERSION.to_string(),
        },
    };

    JsonRpcResponse::from_result(id, &result)
}

/// Handle tools/list request.
fn handle_tools_list(gateway: &Gateway, id: Option<Value>) -> JsonRpcResponse {
    let result = ToolsListResult {
        tools: gateway.list_tools(),
    };
    JsonRpcResponse::from_result(id, &result)
}

/// Handle tools/call request.
async fn handle_tools_call(
    gateway: &Gateway,
    id: Option<Value>,
    params: Option<Value>,
) -> JsonRpcResponse {
    let params: ToolCallParams = match params {
        Some(p) => match serde_json::from_value(p) {
            Ok(params) => params,
            Err(e) => {
                return JsonRpcResponse::error(id, INVALID_PARAMS, &format!("Invalid params: {}", e))
            }
        },
        None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
    };

    let result = gateway.dispatch(&params.name, params.arguments).await;
    JsonRpcResponse::from_result(id, &result)
}
