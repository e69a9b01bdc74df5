//! MCP tool definitions for spotify-mcp.
//!
//! [`TOOLS`] is the single table both the advertised descriptors and the
//! dispatch handlers are derived from, so a tool cannot be listed without
//! being callable or callable without being listed.

use super::protocol::Tool;
use super::validate::ValidatedArgs;
use crate::error::Result;
use crate::spotify::{
    AddTracksRequest, CreatePlaylistRequest, PageRequest, PlaylistTracksRequest,
    RecommendationRequest, SearchRequest, SpotifyClient,
};
use futures::future::BoxFuture;
use serde_json::{json, Map, Value};

/// JSON type accepted for a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    Number,
    Boolean,
    StringArray,
}

impl ParamKind {
    fn schema(self) -> Value {
        match self {
            ParamKind::String => json!({ "type": "string" }),
            ParamKind::Integer => json!({ "type": "integer" }),
            ParamKind::Number => json!({ "type": "number" }),
            ParamKind::Boolean => json!({ "type": "boolean" }),
            ParamKind::StringArray => json!({ "type": "array", "items": { "type": "string" } }),
        }
    }
}

/// Value substituted when an optional parameter is omitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Integer(i64),
    Boolean(bool),
    String(&'static str),
}

impl DefaultValue {
    pub fn to_json(self) -> Value {
        match self {
            DefaultValue::Integer(n) => json!(n),
            DefaultValue::Boolean(b) => json!(b),
            DefaultValue::String(s) => json!(s),
        }
    }
}

/// Declared shape of one tool parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub description: &'static str,
    pub default: Option<DefaultValue>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl ParamSpec {
    pub const fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            description,
            default: None,
            minimum: None,
            maximum: None,
        }
    }

    pub const fn optional(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind, description)
        }
    }

    pub const fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    pub const fn between(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    pub const fn at_least(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    fn schema(&self) -> Value {
        let mut schema = self.kind.schema();
        if let Value::Object(fields) = &mut schema {
            fields.insert("description".to_string(), json!(self.description));
            if let Some(default) = self.default {
                fields.insert("default".to_string(), default.to_json());
            }
            if let Some(minimum) = self.minimum {
                fields.insert("minimum".to_string(), json!(minimum));
            }
            if let Some(maximum) = self.maximum {
                fields.insert("maximum".to_string(), json!(maximum));
            }
        }
        schema
    }
}

/// Async function implementing a tool.
pub type ToolHandler = for<'a> fn(&'a SpotifyClient, ValidatedArgs) -> BoxFuture<'a, Result<String>>;

/// A callable tool: its advertised description, parameters and handler.
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
    pub handler: ToolHandler,
}

impl ToolSpec {
    /// JSON schema advertised to MCP clients.
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.to_string(), p.schema()))
            .collect();
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required
        })
    }

    pub fn descriptor(&self) -> Tool {
        Tool {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: self.input_schema(),
        }
    }
}

const SEARCH_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("query", ParamKind::String, "Search query (track, artist, album keywords)"),
    ParamSpec::optional("limit", ParamKind::Integer, "Maximum number of results (1-50)")
        .with_default(DefaultValue::Integer(SearchRequest::DEFAULT_LIMIT)),
];

const RECOMMENDATION_PARAMS: &[ParamSpec] = &[
    ParamSpec::optional("seed_tracks", ParamKind::StringArray, "Spotify track IDs to seed from"),
    ParamSpec::optional("seed_artists", ParamKind::StringArray, "Spotify artist IDs to seed from"),
    ParamSpec::optional("seed_genres", ParamKind::StringArray, "Genre names to seed from"),
    ParamSpec::optional("limit", ParamKind::Integer, "Number of recommendations (1-100)")
        .with_default(DefaultValue::Integer(RecommendationRequest::DEFAULT_LIMIT)),
    ParamSpec::optional("target_energy", ParamKind::Number, "Target energy (0.0-1.0)")
        .between(0.0, 1.0),
    ParamSpec::optional("target_danceability", ParamKind::Number, "Target danceability (0.0-1.0)")
        .between(0.0, 1.0),
    ParamSpec::optional("target_tempo", ParamKind::Number, "Target tempo in BPM").at_least(0.0),
];

const CREATE_PLAYLIST_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("name", ParamKind::String, "Name of the new playlist"),
    ParamSpec::optional("description", ParamKind::String, "Playlist description")
        .with_default(DefaultValue::String("")),
    ParamSpec::optional("public", ParamKind::Boolean, "Whether the playlist is public")
        .with_default(DefaultValue::Boolean(false)),
];

const ADD_TRACKS_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("playlist_id", ParamKind::String, "ID of the playlist to add to"),
    ParamSpec::required(
        "track_uris",
        ParamKind::StringArray,
        "Spotify track URIs (spotify:track:...) to add",
    ),
    ParamSpec::optional("position", ParamKind::Integer, "Zero-based insert position (default: append)")
        .at_least(0.0),
];

const LIST_PLAYLISTS_PARAMS: &[ParamSpec] = &[
    ParamSpec::optional("limit", ParamKind::Integer, "Maximum number of playlists (1-50)")
        .with_default(DefaultValue::Integer(PageRequest::DEFAULT_LIMIT)),
    ParamSpec::optional("offset", ParamKind::Integer, "Index of the first playlist to return")
        .with_default(DefaultValue::Integer(0))
        .at_least(0.0),
];

const LIST_PLAYLIST_TRACKS_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("playlist_id", ParamKind::String, "ID of the playlist"),
    ParamSpec::optional("limit", ParamKind::Integer, "Maximum number of tracks (1-100)")
        .with_default(DefaultValue::Integer(PlaylistTracksRequest::DEFAULT_LIMIT)),
    ParamSpec::optional("offset", ParamKind::Integer, "Index of the first track to return")
        .with_default(DefaultValue::Integer(0))
        .at_least(0.0),
];

/// Every tool the server exposes, in advertised order.
pub static TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "search-tracks",
        description: "Search Spotify for tracks. Returns title, artists, album, duration, \
            URI, ID and popularity for each match.",
        params: SEARCH_PARAMS,
        handler: search_tracks,
    },
    ToolSpec {
        name: "get-recommendations",
        description: "Get track recommendations from 1-5 combined seeds (tracks, artists, genres), \
            optionally steered by target energy, danceability and tempo.",
        params: RECOMMENDATION_PARAMS,
        handler: get_recommendations,
    },
    ToolSpec {
        name: "create-playlist",
        description: "Create a new playlist for the current user. Returns the playlist ID and URL.",
        params: CREATE_PLAYLIST_PARAMS,
        handler: create_playlist,
    },
    ToolSpec {
        name: "add-tracks-to-playlist",
        description: "Add tracks to a playlist by URI, optionally at a given position. \
            Returns the new snapshot ID.",
        params: ADD_TRACKS_PARAMS,
        handler: add_tracks_to_playlist,
    },
    ToolSpec {
        name: "list-user-playlists",
        description: "List the current user's playlists with track counts, visibility and URLs.",
        params: LIST_PLAYLISTS_PARAMS,
        handler: list_user_playlists,
    },
    ToolSpec {
        name: "list-playlist-tracks",
        description: "List the tracks of a playlist with artists, album, duration and when each was added.",
        params: LIST_PLAYLIST_TRACKS_PARAMS,
        handler: list_playlist_tracks,
    },
];

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    TOOLS.iter().map(ToolSpec::descriptor).collect()
}

/// Look up a tool by name.
pub fn find_tool(name: &str) -> Option<&'static ToolSpec> {
    TOOLS.iter().find(|t| t.name == name)
}

fn search_tracks(client: &SpotifyClient, args: ValidatedArgs) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let request = SearchRequest {
            query: args.string("query"),
            limit: args.integer("limit").unwrap_or(SearchRequest::DEFAULT_LIMIT),
        };
        client.search_tracks(&request).await
    })
}

fn get_recommendations(
    client: &SpotifyClient,
    args: ValidatedArgs,
) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let request = RecommendationRequest {
            seed_tracks: args.strings("seed_tracks"),
            seed_artists: args.strings("seed_artists"),
            seed_genres: args.strings("seed_genres"),
            limit: args
                .integer("limit")
                .unwrap_or(RecommendationRequest::DEFAULT_LIMIT),
            target_energy: args.number("target_energy"),
            target_danceability: args.number("target_danceability"),
            target_tempo: args.number("target_tempo"),
        };
        client.get_recommendations(&request).await
    })
}

fn create_playlist(client: &SpotifyClient, args: ValidatedArgs) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let request = CreatePlaylistRequest {
            name: args.string("name"),
            description: args.string("description"),
            public: args.boolean("public").unwrap_or(false),
        };
        client.create_playlist(&request).await
    })
}

fn add_tracks_to_playlist(
    client: &SpotifyClient,
    args: ValidatedArgs,
) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let request = AddTracksRequest {
            playlist_id: args.string("playlist_id"),
            track_uris: args.strings("track_uris"),
            position: args.integer("position"),
        };
        client.add_tracks_to_playlist(&request).await
    })
}

fn list_user_playlists(
    client: &SpotifyClient,
    args: ValidatedArgs,
) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let request = PageRequest {
            limit: args.integer("limit").unwrap_or(PageRequest::DEFAULT_LIMIT),
            offset: args.integer("offset").unwrap_or(0),
        };
        client.list_user_playlists(&request).await
    })
}

fn list_playlist_tracks(
    client: &SpotifyClient,
    args: ValidatedArgs,
) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let request = PlaylistTracksRequest {
            playlist_id: args.string("playlist_id"),
            limit: args
                .integer("limit")
                .unwrap_or(PlaylistTracksRequest::DEFAULT_LIMIT),
            offset: args.integer("offset").unwrap_or(0),
        };
        client.list_playlist_tracks(&request).await
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tool_names_are_unique_and_ordered() {
        let names: Vec<&str> = TOOLS.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "search-tracks",
                "get-recommendations",
                "create-playlist",
                "add-tracks-to-playlist",
                "list-user-playlists",
                "list-playlist-tracks",
            ]
        );
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_descriptors_match_registry() {
        let tools = get_tools();
        assert_eq!(tools.len(), TOOLS.len());
        for tool in &tools {
            assert!(find_tool(&tool.name).is_some());
        }
        assert!(find_tool("play").is_none());
    }

    #[test]
    fn test_search_schema() {
        let schema = find_tool("search-tracks").unwrap().input_schema();
        assert_eq!(schema["required"], json!(["query"]));
        assert_eq!(schema["properties"]["query"]["type"], "string");
        assert_eq!(schema["properties"]["limit"]["default"], 10);
    }

    #[test]
    fn test_defaults_follow_operation_constraints() {
        let create = find_tool("create-playlist").unwrap().input_schema();
        assert_eq!(create["properties"]["description"]["default"], "");
        assert_eq!(create["properties"]["public"]["default"], false);

        let tracks = find_tool("list-playlist-tracks").unwrap().input_schema();
        assert_eq!(tracks["properties"]["limit"]["default"], 50);
        assert_eq!(tracks["properties"]["offset"]["minimum"], 0.0);
        assert_eq!(tracks["required"], json!(["playlist_id"]));

        let recs = find_tool("get-recommendations").unwrap().input_schema();
        assert_eq!(recs["required"], json!([]));
        assert_eq!(recs["properties"]["seed_genres"]["items"]["type"], "string");
        assert_eq!(recs["properties"]["limit"]["default"], 20);
    }
}
