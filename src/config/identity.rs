//! Spotify client identity sourced from the process environment.

use crate::error::{Result, SpotifyMcpError};
use std::fmt;
use tracing::warn;

pub const CLIENT_ID_VAR: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "SPOTIFY_CLIENT_SECRET";
pub const REFRESH_TOKEN_VAR: &str = "SPOTIFY_REFRESH_TOKEN";

/// The application credentials and the long-lived refresh token.
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct ClientIdentity {
    client_id: String,
    client_secret: String,
    refresh_token: String,
}

impl ClientIdentity {
    /// Build an identity from optional raw values.
    ///
    /// Missing or empty values are a configuration error. Values wrapped in
    /// whitespace or quotes are accepted as given but logged as a warning.
    pub fn new(
        client_id: Option<String>,
        client_secret: Option<String>,
        refresh_token: Option<String>,
    ) -> Result<Self> {
        let fields = [
            (CLIENT_ID_VAR, client_id),
            (CLIENT_SECRET_VAR, client_secret),
            (REFRESH_TOKEN_VAR, refresh_token),
        ];

        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(SpotifyMcpError::Config(format!(
                "missing required environment variable(s): {}",
                missing.join(", ")
            )));
        }

        let [(_, client_id), (_, client_secret), (_, refresh_token)] = fields;
        let identity = Self {
            client_id: client_id.unwrap_or_default(),
            client_secret: client_secret.unwrap_or_default(),
            refresh_token: refresh_token.unwrap_or_default(),
        };

        for variable in identity.contaminated_fields() {
            warn!(
                variable,
                "value has leading/trailing whitespace or quotes; check your environment"
            );
        }

        Ok(identity)
    }

    /// Read the identity from `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` and
    /// `SPOTIFY_REFRESH_TOKEN`.
    pub fn from_env() -> Result<Self> {
        Self::new(
            std::env::var(CLIENT_ID_VAR).ok(),
            std::env::var(CLIENT_SECRET_VAR).ok(),
            std::env::var(REFRESH_TOKEN_VAR).ok(),
        )
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Names of the variables whose values look accidentally quoted or padded.
    pub fn contaminated_fields(&self) -> Vec<&'static str> {
        [
            (CLIENT_ID_VAR, &self.client_id),
            (CLIENT_SECRET_VAR, &self.client_secret),
            (REFRESH_TOKEN_VAR, &self.refresh_token),
        ]
        .into_iter()
        .filter(|(_, value)| is_contaminated(value))
        .map(|(name, _)| name)
        .collect()
    }
}

impl fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// True when a value starts or ends with whitespace or a quote character.
pub fn is_contaminated(value: &str) -> bool {
    let edge = |c: char| c.is_whitespace() || c == '"' || c == '\'';
    value.starts_with(edge) || value.ends_with(edge)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_complete_identity() {
        let identity = ClientIdentity::new(some("id"), some("secret"), some("refresh")).unwrap();
        assert_eq!(identity.client_id(), "id");
        assert_eq!(identity.client_secret(), "secret");
        assert_eq!(identity.refresh_token(), "refresh");
        assert!(identity.contaminated_fields().is_empty());
    }

    #[test]
    fn test_missing_values_are_reported_together() {
        let err = ClientIdentity::new(some("id"), None, some("")).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, SpotifyMcpError::Config(_)));
        assert!(message.contains(CLIENT_SECRET_VAR));
        assert!(message.contains(REFRESH_TOKEN_VAR));
        assert!(!message.contains(CLIENT_ID_VAR));
    }

    #[test]
    fn test_contamination_warns_but_succeeds() {
        let identity =
            ClientIdentity::new(some("\"id\""), some("secret "), some("refresh")).unwrap();
        assert_eq!(identity.client_id(), "\"id\"");
        assert_eq!(
            identity.contaminated_fields(),
            vec![CLIENT_ID_VAR, CLIENT_SECRET_VAR]
        );
    }

    #[test]
    fn test_is_contaminated() {
        assert!(is_contaminated(" abc"));
        assert!(is_contaminated("abc\n"));
        assert!(is_contaminated("'abc'"));
        assert!(!is_contaminated("a b\"c"));
        assert!(!is_contaminated("abc"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let identity =
            ClientIdentity::new(some("id"), some("s3cr3t"), some("r3fr3sh")).unwrap();
        let debug = format!("{:?}", identity);
        assert!(!debug.contains("s3cr3t"));
        assert!(!debug.contains("r3fr3sh"));
        assert!(debug.contains("[REDACTED]"));
    }
}
