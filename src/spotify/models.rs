//! Spotify Web API response models.
//!
//! Only the fields the tools render are modelled; everything else in the
//! upstream payloads is ignored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedArtist {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimplifiedAlbum {
    #[serde(default)]
    pub name: String,
}

/// A full track object. Local files have no `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub popularity: Option<u32>,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
    #[serde(default)]
    pub album: SimplifiedAlbum,
}

impl Track {
    /// Artist names joined with commas.
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Offset-based page wrapper used by every list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub offset: u32,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub tracks: Paging<Track>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub collaborative: bool,
    #[serde(default)]
    pub tracks: PlaylistTracksRef,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

impl Playlist {
    /// Public web URL, falling back to the canonical open.spotify.com form.
    pub fn url(&self) -> String {
        self.external_urls
            .spotify
            .clone()
            .unwrap_or_else(|| format!("https://open.spotify.com/playlist/{}", self.id))
    }
}

/// One row of a playlist. `track` is null for removed or unavailable items.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTrackItem {
    #[serde(default)]
    pub added_at: Option<String>,
    #[serde(default)]
    pub track: Option<Track>,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_with_nulls_deserializes() {
        let track: Track = serde_json::from_str(
            r#"{"id":null,"name":"Local","uri":"spotify:local:a:b:c:1","duration_ms":1000,
                "artists":[{"name":"A"},{"name":"B","id":"2"}]}"#,
        )
        .unwrap();
        assert!(track.id.is_none());
        assert_eq!(track.artist_names(), "A, B");
        assert_eq!(track.album.name, "");
    }

    #[test]
    fn test_playlist_url_fallback() {
        let playlist: Playlist =
            serde_json::from_str(r#"{"id":"37i9","name":"Mix","tracks":{"total":3}}"#).unwrap();
        assert_eq!(playlist.url(), "https://open.spotify.com/playlist/37i9");
        assert_eq!(playlist.tracks.total, 3);
    }
}
