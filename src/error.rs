//! Error types for spotify-mcp.

use thiserror::Error;

/// Library-level error type for spotify-mcp operations.
#[derive(Error, Debug)]
pub enum SpotifyMcpError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid arguments: {0}")]
    Validation(String),

    #[error("Failed to refresh access token ({}): {body}", status_label(.status))]
    CredentialRenewal { status: Option<u16>, body: String },

    #[error("Spotify API error: {status} {status_text} - {body}")]
    RemoteService {
        status: u16,
        status_text: String,
        body: String,
    },

    /// A multi-request write failed after earlier requests had been applied.
    #[error(
        "Added {added} of {requested} tracks (snapshot {snapshot_id}) before a later batch failed: {source}"
    )]
    PartialWrite {
        added: usize,
        requested: usize,
        snapshot_id: String,
        source: Box<SpotifyMcpError>,
    },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "no response".to_string(),
    }
}

/// Result type alias for spotify-mcp operations.
pub type Result<T> = std::result::Result<T, SpotifyMcpError>;
