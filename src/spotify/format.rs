//! Plain-text rendering of Spotify results for the calling agent.

use super::models::{Paging, Playlist, PlaylistTrackItem, Track};
use chrono::DateTime;

/// Format a duration in milliseconds as `m:ss`, truncating partial seconds.
pub fn format_duration(ms: u64) -> String {
    let total_seconds = ms / 1000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Render an ISO-8601 timestamp as `YYYY-MM-DD HH:MM UTC`, or echo it back
/// unchanged if it does not parse.
pub fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.naive_utc().format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// `Showing 21-40 of 75 playlists:`
pub fn pagination_header(offset: u32, shown: usize, total: u32, noun: &str) -> String {
    let first = offset as usize + 1;
    let last = offset as usize + shown;
    format!("Showing {}-{} of {} {}:", first, last, total, noun)
}

fn track_block(position: usize, track: &Track) -> String {
    let mut block = format!(
        "{}. \"{}\" by {}\n   Album: {} | Duration: {}",
        position,
        track.name,
        track.artist_names(),
        track.album.name,
        format_duration(track.duration_ms)
    );
    if let Some(popularity) = track.popularity {
        block.push_str(&format!(" | Popularity: {}", popularity));
    }
    block.push_str(&format!(
        "\n   URI: {} | ID: {}",
        track.uri,
        track.id.as_deref().unwrap_or("n/a")
    ));
    block
}

fn numbered_tracks<'a>(tracks: impl IntoIterator<Item = &'a Track>) -> String {
    tracks
        .into_iter()
        .enumerate()
        .map(|(i, t)| track_block(i + 1, t))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn search_results(query: &str, tracks: &[Track]) -> String {
    if tracks.is_empty() {
        return format!("No tracks found for \"{}\".", query);
    }
    format!(
        "Found {} tracks for \"{}\":\n\n{}",
        tracks.len(),
        query,
        numbered_tracks(tracks)
    )
}

pub fn recommendations(seed_summary: &str, tracks: &[Track]) -> String {
    if tracks.is_empty() {
        return format!(
            "No recommendations found for the given seeds.\nSeeds: {}",
            seed_summary
        );
    }
    format!(
        "Seeds: {}\n\n{} recommended tracks:\n\n{}",
        seed_summary,
        tracks.len(),
        numbered_tracks(tracks)
    )
}

pub fn playlist_created(playlist: &Playlist) -> String {
    format!(
        "Created {} playlist \"{}\".\nID: {}\nURL: {}",
        visibility(playlist).to_lowercase(),
        playlist.name,
        playlist.id,
        playlist.url()
    )
}

pub fn tracks_added(count: usize, playlist_id: &str, snapshot_id: &str) -> String {
    let noun = if count == 1 { "track" } else { "tracks" };
    format!(
        "Added {} {} to playlist {}.\nSnapshot ID: {}",
        count, noun, playlist_id, snapshot_id
    )
}

fn visibility(playlist: &Playlist) -> &'static str {
    match playlist.public {
        Some(true) => "Public",
        _ => "Private",
    }
}

fn playlist_block(position: usize, playlist: &Playlist) -> String {
    let description = playlist
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or("(no description)");
    let mut visibility = visibility(playlist).to_string();
    if playlist.collaborative {
        visibility.push_str(", collaborative");
    }
    format!(
        "{}. {}\n   {}\n   Tracks: {} | {}\n   ID: {}\n   URL: {}",
        position,
        playlist.name,
        description,
        playlist.tracks.total,
        visibility,
        playlist.id,
        playlist.url()
    )
}

pub fn playlists(page: &Paging<Playlist>) -> String {
    if page.items.is_empty() {
        if page.total == 0 {
            return "You don't have any playlists yet.".to_string();
        }
        return format!(
            "No playlists at offset {} (you have {} in total).",
            page.offset, page.total
        );
    }

    let body = page
        .items
        .iter()
        .enumerate()
        .map(|(i, p)| playlist_block(page.offset as usize + i + 1, p))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "{}\n\n{}",
        pagination_header(page.offset, page.items.len(), page.total, "playlists"),
        body
    )
}

pub fn playlist_tracks(playlist: &Playlist, page: &Paging<PlaylistTrackItem>) -> String {
    if page.items.is_empty() {
        if page.total == 0 {
            return format!("Playlist \"{}\" is empty.", playlist.name);
        }
        return format!(
            "No tracks at offset {} in playlist \"{}\" ({} in total).",
            page.offset, playlist.name, page.total
        );
    }

    let body = page
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let position = page.offset as usize + i + 1;
            match &item.track {
                Some(track) => {
                    let added = item
                        .added_at
                        .as_deref()
                        .map(format_timestamp)
                        .unwrap_or_else(|| "unknown".to_string());
                    format!("{}\n   Added: {}", track_block(position, track), added)
                }
                None => format!("{}. (unavailable track)", position),
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Playlist \"{}\"\n{}\n\n{}",
        playlist.name,
        pagination_header(page.offset, page.items.len(), page.total, "tracks"),
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotify::models::{ExternalUrls, PlaylistTracksRef, SimplifiedAlbum, SimplifiedArtist};

    fn track(name: &str) -> Track {
        Track {
            id: Some("4uLU6hMCjMI75M1A2tKUQC".to_string()),
            name: name.to_string(),
            uri: "spotify:track:4uLU6hMCjMI75M1A2tKUQC".to_string(),
            duration_ms: 213_573,
            popularity: Some(80),
            artists: vec![SimplifiedArtist {
                name: "Rick Astley".to_string(),
            }],
            album: SimplifiedAlbum {
                name: "Whenever You Need Somebody".to_string(),
            },
        }
    }

    fn playlist(public: Option<bool>) -> Playlist {
        Playlist {
            id: "pl1".to_string(),
            name: "Road Trip".to_string(),
            description: Some(String::new()),
            public,
            collaborative: false,
            tracks: PlaylistTracksRef { total: 12 },
            external_urls: ExternalUrls::default(),
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(125_000), "2:05");
        assert_eq!(format_duration(59_999), "0:59");
        assert_eq!(format_duration(600_000), "10:00");
        assert_eq!(format_duration(0), "0:00");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("2023-04-01T09:30:00Z"), "2023-04-01 09:30 UTC");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn test_pagination_header() {
        assert_eq!(pagination_header(20, 20, 75, "playlists"), "Showing 21-40 of 75 playlists:");
    }

    #[test]
    fn test_search_results_render() {
        let text = search_results("never gonna", &[track("Never Gonna Give You Up")]);
        assert!(text.starts_with("Found 1 tracks for \"never gonna\":"));
        assert!(text.contains("1. \"Never Gonna Give You Up\" by Rick Astley"));
        assert!(text.contains("Duration: 3:33 | Popularity: 80"));
        assert!(text.contains("ID: 4uLU6hMCjMI75M1A2tKUQC"));

        assert_eq!(search_results("zzz", &[]), "No tracks found for \"zzz\".");
    }

    #[test]
    fn test_playlist_block_defaults() {
        let block = playlist_block(3, &playlist(None));
        assert!(block.starts_with("3. Road Trip"));
        assert!(block.contains("(no description)"));
        assert!(block.contains("Tracks: 12 | Private"));
        assert!(block.contains("https://open.spotify.com/playlist/pl1"));
    }

    #[test]
    fn test_empty_states() {
        let empty: Paging<Playlist> = Paging {
            items: vec![],
            total: 0,
            offset: 0,
        };
        assert_eq!(playlists(&empty), "You don't have any playlists yet.");

        let no_tracks: Paging<PlaylistTrackItem> = Paging {
            items: vec![],
            total: 0,
            offset: 0,
        };
        assert_eq!(
            playlist_tracks(&playlist(Some(true)), &no_tracks),
            "Playlist \"Road Trip\" is empty."
        );
    }

    #[test]
    fn test_tracks_added_pluralises() {
        assert_eq!(
            tracks_added(1, "pl1", "snap"),
            "Added 1 track to playlist pl1.\nSnapshot ID: snap"
        );
        assert!(tracks_added(3, "pl1", "snap").starts_with("Added 3 tracks"));
    }
}
