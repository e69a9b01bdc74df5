//! Configuration settings for spotify-mcp.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub spotify: SpotifySettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Spotify endpoint and client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotifySettings {
    /// Base URL of the Web API (no trailing slash).
    pub api_base_url: String,
    /// Base URL of the accounts service hosting `/api/token`.
    pub accounts_base_url: String,
    /// Timeout applied to every HTTP request.
    pub request_timeout_secs: u64,
    /// Fraction of the issued token lifetime the cache trusts.
    pub expiry_safety_factor: f64,
}

impl Default for SpotifySettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.spotify.com/v1".to_string(),
            accounts_base_url: "https://accounts.spotify.com".to_string(),
            request_timeout_secs: 30,
            expiry_safety_factor: 0.9,
        }
    }
}

impl SpotifySettings {
    /// Full URL of the token endpoint.
    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.accounts_base_url.trim_end_matches('/'))
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            settings.validate()?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("spotify-mcp")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    fn validate(&self) -> crate::error::Result<()> {
        let factor = self.spotify.expiry_safety_factor;
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(crate::error::SpotifyMcpError::Config(format!(
                "spotify.expiry_safety_factor must be in (0, 1], got {}",
                factor
            )));
        }
        if self.spotify.request_timeout_secs == 0 {
            return Err(crate::error::SpotifyMcpError::Config(
                "spotify.request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.spotify.api_base_url, "https://api.spotify.com/v1");
        assert_eq!(
            settings.spotify.token_url(),
            "https://accounts.spotify.com/api/token"
        );
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[spotify]\nrequest_timeout_secs = 5\n").unwrap();

        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.spotify.request_timeout_secs, 5);
        assert_eq!(settings.spotify.expiry_safety_factor, 0.9);
        assert_eq!(settings.general.log_level, "info");
    }

    #[test]
    fn test_rejects_out_of_range_safety_factor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[spotify]\nexpiry_safety_factor = 1.5\n").unwrap();

        let err = Settings::load_from(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("expiry_safety_factor"));
    }
}
