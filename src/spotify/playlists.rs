//! Playlist operations for the current user.

use super::models::{Paging, Playlist, PlaylistTrackItem, SnapshotResponse, UserProfile};
use super::{clamp_limit, format, SpotifyClient};
use crate::error::{Result, SpotifyMcpError};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Spotify accepts at most this many URIs per add-items request.
const MAX_URIS_PER_REQUEST: usize = 100;

const PLAYLIST_FIELDS: &str =
    "id,name,description,public,collaborative,tracks(total),external_urls";

/// Parameters for `create-playlist`.
#[derive(Debug, Clone)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

/// Parameters for `add-tracks-to-playlist`.
#[derive(Debug, Clone)]
pub struct AddTracksRequest {
    pub playlist_id: String,
    pub track_uris: Vec<String>,
    pub position: Option<i64>,
}

/// Offset pagination for `list-user-playlists`.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 50;
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Parameters for `list-playlist-tracks`.
#[derive(Debug, Clone)]
pub struct PlaylistTracksRequest {
    pub playlist_id: String,
    pub limit: i64,
    pub offset: i64,
}

impl PlaylistTracksRequest {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 100;
}

#[derive(Serialize)]
struct NewPlaylistBody<'a> {
    name: &'a str,
    description: &'a str,
    public: bool,
}

#[derive(Serialize)]
struct AddItemsBody<'a> {
    uris: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<i64>,
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SpotifyMcpError::Validation(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        SpotifyMcpError::Validation(format!("{} must be between 0 and {}, got {}", field, u32::MAX, value))
    })
}

impl SpotifyClient {
    /// Create a playlist owned by the current user.
    #[instrument(skip(self), fields(name = %request.name))]
    pub async fn create_playlist(&self, request: &CreatePlaylistRequest) -> Result<String> {
        require_non_empty("name", &request.name)?;

        let me: UserProfile = self.get(&["me"], &[]).await?;
        debug!("Creating playlist for user {}", me.id);

        let body = NewPlaylistBody {
            name: &request.name,
            description: &request.description,
            public: request.public,
        };
        let playlist: Playlist = self.post(&["users", &me.id, "playlists"], &body).await?;

        info!(playlist_id = %playlist.id, "Playlist created");
        Ok(format::playlist_created(&playlist))
    }

    /// Append (or insert at `position`) tracks in a playlist.
    ///
    /// Lists longer than Spotify's per-request cap are sent in consecutive
    /// batches; the returned snapshot is the one from the final batch.
    #[instrument(skip(self), fields(playlist_id = %request.playlist_id, count = request.track_uris.len()))]
    pub async fn add_tracks_to_playlist(&self, request: &AddTracksRequest) -> Result<String> {
        require_non_empty("playlist_id", &request.playlist_id)?;
        if request.track_uris.is_empty() {
            return Err(SpotifyMcpError::Validation(
                "track_uris must contain at least one URI".to_string(),
            ));
        }
        if let Some(position) = request.position {
            require_non_negative("position", position)?;
        }

        let mut snapshot_id = String::new();
        for (batch, uris) in request.track_uris.chunks(MAX_URIS_PER_REQUEST).enumerate() {
            let body = AddItemsBody {
                uris,
                position: request
                    .position
                    .map(|p| p + (batch * MAX_URIS_PER_REQUEST) as i64),
            };
            let response: Result<SnapshotResponse> = self
                .post(&["playlists", &request.playlist_id, "tracks"], &body)
                .await;
            match response {
                Ok(response) => snapshot_id = response.snapshot_id,
                Err(e) if batch == 0 => return Err(e),
                Err(e) => {
                    let added = batch * MAX_URIS_PER_REQUEST;
                    warn!(added, "Adding tracks failed part way through");
                    return Err(SpotifyMcpError::PartialWrite {
                        added,
                        requested: request.track_uris.len(),
                        snapshot_id,
                        source: Box::new(e),
                    });
                }
            }
        }

        Ok(format::tracks_added(
            request.track_uris.len(),
            &request.playlist_id,
            &snapshot_id,
        ))
    }

    /// List the current user's playlists, one page at a time.
    #[instrument(skip(self))]
    pub async fn list_user_playlists(&self, request: &PageRequest) -> Result<String> {
        let offset = require_non_negative("offset", request.offset)?;
        let limit = clamp_limit(request.limit, PageRequest::MAX_LIMIT);

        let query = [("limit", limit.to_string()), ("offset", offset.to_string())];
        let mut page: Paging<Playlist> = self.get(&["me", "playlists"], &query).await?;
        page.offset = offset;

        debug!("Fetched {} of {} playlists", page.items.len(), page.total);
        Ok(format::playlists(&page))
    }

    /// List one page of a playlist's tracks, headed by the playlist name.
    #[instrument(skip(self), fields(playlist_id = %request.playlist_id))]
    pub async fn list_playlist_tracks(&self, request: &PlaylistTracksRequest) -> Result<String> {
        require_non_empty("playlist_id", &request.playlist_id)?;
        let offset = require_non_negative("offset", request.offset)?;
        let limit = clamp_limit(request.limit, PlaylistTracksRequest::MAX_LIMIT);

        let meta_query = [("fields", PLAYLIST_FIELDS.to_string())];
        let page_query = [("limit", limit.to_string()), ("offset", offset.to_string())];

        let playlist_segments = ["playlists", request.playlist_id.as_str()];
        let tracks_segments = ["playlists", request.playlist_id.as_str(), "tracks"];
        let (playlist, mut page): (Playlist, Paging<PlaylistTrackItem>) = futures::try_join!(
            self.get(&playlist_segments, &meta_query),
            self.get(&tracks_segments, &page_query),
        )?;
        page.offset = offset;

        debug!("Fetched {} of {} tracks", page.items.len(), page.total);
        Ok(format::playlist_tracks(&playlist, &page))
    }
}
