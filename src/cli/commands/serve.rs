//! Serve command implementation.

use crate::cli::IdentityArgs;
use crate::config::Settings;
use crate::mcp::{Gateway, McpServer};
use crate::spotify::SpotifyClient;
use anyhow::Result;
use std::sync::Arc;

/// Run the MCP server on stdio.
///
/// Identity problems are fatal here, before any request is read.
pub async fn run_serve(identity: &IdentityArgs, settings: &Settings) -> Result<()> {
    let identity = identity.resolve()?;
    let client = SpotifyClient::from_settings(&settings.spotify, identity)?;
    let server = McpServer::new(Gateway::new(Arc::new(client)));
    server.run().await
}
