//! spotify-mcp - Spotify tools behind the Model Context Protocol
//!
//! Manages the lifetime of a Spotify access token derived from a long-lived
//! refresh token, and routes named tool calls from an AI agent to the Spotify
//! Web API.
//!
//! # Architecture
//!
//! - `config` - Settings file and client identity
//! - `auth` - Access token cache and renewal
//! - `spotify` - Web API client, catalog and playlist operations, text rendering
//! - `mcp` - Tool registry, argument validation, gateway and stdio server
//! - `cli` - Command-line surface
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use spotify_mcp::config::{ClientIdentity, Settings};
//! use spotify_mcp::mcp::Gateway;
//! use spotify_mcp::spotify::SpotifyClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let client = SpotifyClient::from_settings(&settings.spotify, ClientIdentity::from_env()?)?;
//!     let gateway = Gateway::new(Arc::new(client));
//!
//!     let result = gateway
//!         .dispatch("search-tracks", Some(serde_json::json!({ "query": "Dancing Queen" })))
//!         .await;
//!     println!("{}", result.joined_text());
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod spotify;

pub use error::{Result, SpotifyMcpError};
