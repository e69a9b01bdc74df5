//! Tool-call gateway: validate, route, and wrap every outcome in an envelope.

use super::protocol::{Tool, ToolCallResult};
use super::tools::{find_tool, get_tools};
use super::validate::{into_error, validate};
use crate::error::{Result, SpotifyMcpError};
use crate::spotify::SpotifyClient;
use futures::FutureExt;
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Routes named tool calls to their handlers.
///
/// `dispatch` never returns an error: every failure becomes an envelope with
/// `isError` set.
#[derive(Clone)]
pub struct Gateway {
    client: Arc<SpotifyClient>,
}

impl Gateway {
    pub fn new(client: Arc<SpotifyClient>) -> Self {
        Self { client }
    }

    /// Descriptors for every callable tool.
    pub fn list_tools(&self) -> Vec<Tool> {
        get_tools()
    }

    /// Run one tool call and wrap its outcome.
    #[instrument(skip_all, fields(tool = %name))]
    pub async fn dispatch(&self, name: &str, arguments: Option<Value>) -> ToolCallResult {
        let outcome = AssertUnwindSafe(self.try_dispatch(name, arguments.as_ref()))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(text)) => {
                info!("Tool call succeeded");
                ToolCallResult::text(text)
            }
            Ok(Err(SpotifyMcpError::UnknownTool(name))) => {
                warn!("Unknown tool requested");
                ToolCallResult::error(format!("Unknown tool: {}", name))
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Tool call failed");
                ToolCallResult::error(format!("Error: {}", e))
            }
            Err(_) => {
                error!("Tool handler panicked");
                ToolCallResult::error(format!("Error: internal failure while running {}", name))
            }
        }
    }

    async fn try_dispatch(&self, name: &str, arguments: Option<&Value>) -> Result<String> {
        let tool = find_tool(name).ok_or_else(|| SpotifyMcpError::UnknownTool(name.to_string()))?;
        let args = validate(tool, arguments).map_err(|failures| into_error(&failures))?;
        (tool.handler)(&self.client, args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotify::test_support::{client, token_mock};
    use serde_json::json;

    fn gateway(server: &mockito::Server) -> Gateway {
        Gateway::new(Arc::new(client(server)))
    }

    #[tokio::test]
    async fn test_unknown_tool_never_touches_network() {
        let mut server = mockito::Server::new_async().await;
        let token = server
            .mock("POST", "/api/token")
            .expect(0)
            .create_async()
            .await;

        let result = gateway(&server).dispatch("play-song", None).await;
        assert!(result.is_error);
        assert_eq!(result.joined_text(), "Unknown tool: play-song");
        token.assert_async().await;
    }

    #[tokio::test]
    async fn test_invalid_arguments_fail_fast() {
        let mut server = mockito::Server::new_async().await;
        let token = server
            .mock("POST", "/api/token")
            .expect(0)
            .create_async()
            .await;

        let result = gateway(&server)
            .dispatch("search-tracks", Some(json!({ "limit": 5 })))
            .await;
        assert!(result.is_error);
        assert_eq!(
            result.joined_text(),
            "Error: Invalid arguments: 'query' is required"
        );
        token.assert_async().await;
    }

    #[tokio::test]
    async fn test_success_wraps_text() {
        let mut server = mockito::Server::new_async().await;
        let _token = token_mock(&mut server).await;
        let _playlists = server
            .mock("GET", "/v1/me/playlists")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"items":[],"total":0}"#)
            .create_async()
            .await;

        let result = gateway(&server)
            .dispatch("list-user-playlists", Some(json!({})))
            .await;
        assert!(!result.is_error);
        assert_eq!(result.joined_text(), "You don't have any playlists yet.");
    }

    #[tokio::test]
    async fn test_credential_failure_becomes_error_envelope() {
        let mut server = mockito::Server::new_async().await;
        let _token = server
            .mock("POST", "/api/token")
            .with_status(400)
            .with_body(r#"{"error":"invalid_client"}"#)
            .create_async()
            .await;

        let result = gateway(&server)
            .dispatch("search-tracks", Some(json!({ "query": "abba" })))
            .await;
        assert!(result.is_error);
        let text = result.joined_text();
        assert!(text.starts_with("Error: Failed to refresh access token (status 400)"));
        assert!(text.contains("invalid_client"));
    }
}
