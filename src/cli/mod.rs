//! CLI module for spotify-mcp.

pub mod commands;
mod output;

pub use output::Output;

use crate::config::ClientIdentity;
use clap::{Args, Parser, Subcommand};

/// spotify-mcp - Spotify tools for MCP clients
///
/// Keeps a Spotify access token fresh from a long-lived refresh token and
/// exposes search, recommendation and playlist tools over the Model Context
/// Protocol.
#[derive(Parser, Debug)]
#[command(name = "spotify-mcp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(flatten)]
    pub identity: IdentityArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Client identity. Read from the environment unless given on the command line.
#[derive(Args, Clone, Default)]
pub struct IdentityArgs {
    /// Spotify application client ID
    #[arg(long, env = "SPOTIFY_CLIENT_ID", hide_env_values = true, global = true)]
    pub client_id: Option<String>,

    /// Spotify application client secret
    #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true, global = true)]
    pub client_secret: Option<String>,

    /// Long-lived refresh token for the user
    #[arg(long, env = "SPOTIFY_REFRESH_TOKEN", hide_env_values = true, global = true)]
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for IdentityArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let presence = |value: &Option<String>| if value.is_some() { "[set]" } else { "[unset]" };
        f.debug_struct("IdentityArgs")
            .field("client_id", &self.client_id)
            .field("client_secret", &presence(&self.client_secret))
            .field("refresh_token", &presence(&self.refresh_token))
            .finish()
    }
}

impl IdentityArgs {
    /// Build a validated identity. Fails when any value is missing or empty.
    pub fn resolve(&self) -> crate::Result<ClientIdentity> {
        ClientIdentity::new(
            self.client_id.clone(),
            self.client_secret.clone(),
            self.refresh_token.clone(),
        )
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start MCP server on stdio for AI assistant integration
    Serve,

    /// Print the tool descriptors advertised to MCP clients
    Tools,

    /// Call a single tool and print its result
    Call {
        /// Tool name (e.g. search-tracks)
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(short, long)]
        args: Option<String>,
    },

    /// Check credentials and connectivity
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
