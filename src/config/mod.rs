//! Configuration module for spotify-mcp.
//!
//! Handles loading application settings and the Spotify client identity.

mod identity;
mod settings;

pub use identity::{
    is_contaminated, ClientIdentity, CLIENT_ID_VAR, CLIENT_SECRET_VAR, REFRESH_TOKEN_VAR,
};
pub use settings::{GeneralSettings, Settings, SpotifySettings};
