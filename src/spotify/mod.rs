//! Spotify Web API client.
//!
//! Every operation obtains an access token from the shared
//! [`CredentialStore`] before talking to the API, and turns the JSON result
//! into the text handed back to the calling agent.

mod catalog;
pub mod format;
pub mod models;
mod playlists;

pub use catalog::{RecommendationRequest, SearchRequest};
pub use playlists::{AddTracksRequest, CreatePlaylistRequest, PageRequest, PlaylistTracksRequest};

use crate::auth::CredentialStore;
use crate::config::{ClientIdentity, SpotifySettings};
use crate::error::{Result, SpotifyMcpError};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Clamp a requested page size into `1..=max`.
pub(crate) fn clamp_limit(limit: i64, max: i64) -> i64 {
    limit.clamp(1, max)
}

/// Authenticated client for the Spotify Web API.
pub struct SpotifyClient {
    http: Client,
    api_base_url: Url,
    credentials: Arc<CredentialStore>,
}

impl SpotifyClient {
    /// Create a client around an existing HTTP client and credential store.
    pub fn new(
        http: Client,
        api_base_url: &str,
        credentials: Arc<CredentialStore>,
    ) -> Result<Self> {
        let api_base_url = Url::parse(api_base_url.trim_end_matches('/')).map_err(|e| {
            SpotifyMcpError::Config(format!("invalid API base URL '{}': {}", api_base_url, e))
        })?;
        if api_base_url.cannot_be_a_base() {
            return Err(SpotifyMcpError::Config(format!(
                "API base URL '{}' cannot be used as a base",
                api_base_url
            )));
        }

        Ok(Self {
            http,
            api_base_url,
            credentials,
        })
    }

    /// Build the HTTP client and credential store described by the settings.
    pub fn from_settings(settings: &SpotifySettings, identity: ClientIdentity) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .user_agent(concat!("spotify-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let credentials = Arc::new(
            CredentialStore::new(identity, http.clone(), settings.token_url())
                .with_safety_factor(settings.expiry_safety_factor),
        );

        Self::new(http, &settings.api_base_url, credentials)
    }

    /// The shared credential store.
    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    /// Join path segments onto the API base, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Authenticated GET returning JSON.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.endpoint(segments);
        let token = self.credentials.access_token().await?;

        debug!("GET {} with {} params", url.path(), query.len());
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Authenticated POST of a JSON body returning JSON.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T> {
        let url = self.endpoint(segments);
        let token = self.credentials.access_token().await?;

        debug!("POST {}", url.path());
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("Spotify API error ({}): {}", status.as_u16(), text);
            return Err(SpotifyMcpError::RemoteService {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            warn!("Failed to parse Spotify response: {}", e);
            SpotifyMcpError::Json(e)
        })
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[tokio::test]
    async fn test_endpoint_encodes_segments() {
        let server = mockito::Server::new_async().await;
        let client = client(&server);
        let url = client.endpoint(&["playlists", "a b/c", "tracks"]);
        assert_eq!(url.path(), "/v1/playlists/a%20b%2Fc/tracks");
    }

    #[tokio::test]
    async fn test_non_success_maps_to_remote_service_error() {
        let mut server = mockito::Server::new_async().await;
        let _token = token_mock(&mut server).await;
        let _me = server
            .mock("GET", "/v1/me")
            .with_status(403)
            .with_body(r#"{"error":{"status":403,"message":"Insufficient client scope"}}"#)
            .create_async()
            .await;

        let client = client(&server);
        let err = client
            .get::<models::UserProfile>(&["me"], &[])
            .await
            .unwrap_err();
        match err {
            SpotifyMcpError::RemoteService {
                status,
                status_text,
                body,
            } => {
                assert_eq!(status, 403);
                assert_eq!(status_text, "Forbidden");
                assert!(body.contains("Insufficient client scope"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bearer_token_is_attached() {
        let mut server = mockito::Server::new_async().await;
        let _token = token_mock(&mut server).await;
        let me = server
            .mock("GET", "/v1/me")
            .match_header("authorization", "Bearer test-access")
            .with_status(200)
            .with_body(r#"{"id":"alice","display_name":"Alice"}"#)
            .create_async()
            .await;

        let client = client(&server);
        let profile: models::UserProfile = client.get(&["me"], &[]).await.unwrap();
        assert_eq!(profile.id, "alice");
        me.assert_async().await;
    }
}
