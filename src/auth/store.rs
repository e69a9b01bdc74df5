//! Cached access token with transparent renewal.

use crate::config::ClientIdentity;
use crate::error::{Result, SpotifyMcpError};
use chrono::{DateTime, Duration, Utc};
use mockable::{Clock, DefaultClock};
use serde::Deserialize;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, instrument, warn};

const DEFAULT_SAFETY_FACTOR: f64 = 0.9;

/// Successful body of `POST /api/token`.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Holds the current access token and renews it from the refresh token when
/// it is missing or past its (shortened) expiry.
///
/// Created once at process start and shared by every remote operation.
pub struct CredentialStore {
    identity: ClientIdentity,
    http: reqwest::Client,
    token_url: String,
    safety_factor: f64,
    clock: Arc<dyn Clock + Send + Sync>,
    cached: RwLock<Option<CachedToken>>,
    renewal: tokio::sync::Mutex<()>,
}

impl CredentialStore {
    /// Create an empty store. No network traffic happens until the first
    /// call to [`CredentialStore::access_token`].
    pub fn new(identity: ClientIdentity, http: reqwest::Client, token_url: impl Into<String>) -> Self {
        Self {
            identity,
            http,
            token_url: token_url.into(),
            safety_factor: DEFAULT_SAFETY_FACTOR,
            clock: Arc::new(DefaultClock),
            cached: RwLock::new(None),
            renewal: tokio::sync::Mutex::new(()),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = clock;
        self
    }

    /// Fraction of the issued lifetime to trust, in `(0, 1]`.
    pub fn with_safety_factor(mut self, factor: f64) -> Self {
        self.safety_factor = factor;
        self
    }

    /// Return a valid access token, renewing it first if necessary.
    ///
    /// Concurrent callers that find the cache empty wait for a single shared
    /// renewal instead of each exchanging the refresh token.
    pub async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.cached_valid() {
            return Ok(token);
        }

        let _renewing = self.renewal.lock().await;
        if let Some(token) = self.cached_valid() {
            debug!("Access token was renewed by a concurrent caller");
            return Ok(token);
        }

        self.renew().await
    }

    /// Expiry instant of the cached token, if any.
    pub fn cached_expiry(&self) -> Option<DateTime<Utc>> {
        self.read_cache().as_ref().map(|t| t.expires_at)
    }

    fn cached_valid(&self) -> Option<String> {
        let now = self.clock.utc();
        self.read_cache()
            .as_ref()
            .filter(|t| now < t.expires_at)
            .map(|t| t.access_token.clone())
    }

    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, Option<CachedToken>> {
        self.cached.read().unwrap_or_else(|e| e.into_inner())
    }

    #[instrument(skip(self))]
    async fn renew(&self) -> Result<String> {
        debug!("Refreshing Spotify access token");
        let issued_at = self.clock.utc();

        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", self.identity.refresh_token()),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(self.identity.client_id(), Some(self.identity.client_secret()))
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                warn!("Token endpoint unreachable: {}", e);
                SpotifyMcpError::CredentialRenewal {
                    status: None,
                    body: e.to_string(),
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SpotifyMcpError::CredentialRenewal {
                status: Some(status.as_u16()),
                body: e.to_string(),
            })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Token refresh rejected");
            return Err(SpotifyMcpError::CredentialRenewal {
                status: Some(status.as_u16()),
                body,
            });
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            warn!("Malformed token response: {}", e);
            SpotifyMcpError::CredentialRenewal {
                status: Some(status.as_u16()),
                body: format!("malformed token response ({}): {}", e, body),
            }
        })?;

        if token.access_token.is_empty() {
            return Err(SpotifyMcpError::CredentialRenewal {
                status: Some(status.as_u16()),
                body: "token response contained an empty access_token".to_string(),
            });
        }
        if token.refresh_token.is_some() {
            debug!("Token response carried a rotated refresh token; keeping the configured one");
        }

        let expires_at = trusted_expiry(issued_at, token.expires_in, self.safety_factor)
            .ok_or_else(|| {
                warn!(expires_in = token.expires_in, "Token lifetime out of range");
                SpotifyMcpError::CredentialRenewal {
                    status: Some(status.as_u16()),
                    body: format!("expires_in out of range: {}", token.expires_in),
                }
            })?;

        {
            let mut cached = self.cached.write().unwrap_or_else(|e| e.into_inner());
            *cached = Some(CachedToken {
                access_token: token.access_token.clone(),
                expires_at,
            });
        }

        info!(expires_at = %expires_at, "Access token refreshed");
        Ok(token.access_token)
    }
}

/// `issued_at` plus the trusted share of `expires_in` seconds, or `None` when
/// the result cannot be represented.
fn trusted_expiry(issued_at: DateTime<Utc>, expires_in: u64, factor: f64) -> Option<DateTime<Utc>> {
    let trusted_ms = (expires_in as f64 * 1000.0 * factor).round();
    if !(0.0..i64::MAX as f64).contains(&trusted_ms) {
        return None;
    }
    issued_at.checked_add_signed(Duration::try_milliseconds(trusted_ms as i64)?)
}
