//! Catalog operations: track search and recommendations.

use super::models::{RecommendationsResponse, SearchResponse};
use super::{clamp_limit, format, SpotifyClient};
use crate::error::{Result, SpotifyMcpError};
use tracing::{debug, instrument};

/// Parameters for `search-tracks`.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub limit: i64,
}

impl SearchRequest {
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 50;

    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Parameters for `get-recommendations`.
#[derive(Debug, Clone, Default)]
pub struct RecommendationRequest {
    pub seed_tracks: Vec<String>,
    pub seed_artists: Vec<String>,
    pub seed_genres: Vec<String>,
    pub limit: i64,
    pub target_energy: Option<f64>,
    pub target_danceability: Option<f64>,
    pub target_tempo: Option<f64>,
}

impl RecommendationRequest {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;
    pub const MAX_SEEDS: usize = 5;

    /// Combined number of track, artist and genre seeds.
    pub fn seed_count(&self) -> usize {
        self.seed_tracks.len() + self.seed_artists.len() + self.seed_genres.len()
    }

    /// Check the seed budget before anything touches the network.
    pub fn validate(&self) -> Result<()> {
        let count = self.seed_count();
        if count == 0 || count > Self::MAX_SEEDS {
            return Err(SpotifyMcpError::Validation(format!(
                "between 1 and {} seeds are required across seed_tracks, seed_artists and seed_genres (got {})",
                Self::MAX_SEEDS,
                count
            )));
        }
        Ok(())
    }

    /// Human summary of the seeds, e.g. `tracks: a, b; genres: jazz`.
    pub fn seed_summary(&self) -> String {
        [
            ("tracks", &self.seed_tracks),
            ("artists", &self.seed_artists),
            ("genres", &self.seed_genres),
        ]
        .iter()
        .filter(|(_, seeds)| !seeds.is_empty())
        .map(|(label, seeds)| format!("{}: {}", label, seeds.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        for (key, seeds) in [
            ("seed_tracks", &self.seed_tracks),
            ("seed_artists", &self.seed_artists),
            ("seed_genres", &self.seed_genres),
        ] {
            if !seeds.is_empty() {
                query.push((key, seeds.join(",")));
            }
        }
        query.push(("limit", clamp_limit(self.limit, Self::MAX_LIMIT).to_string()));
        for (key, target) in [
            ("target_energy", self.target_energy),
            ("target_danceability", self.target_danceability),
            ("target_tempo", self.target_tempo),
        ] {
            if let Some(value) = target {
                query.push((key, value.to_string()));
            }
        }
        query
    }
}

impl SpotifyClient {
    /// Search the catalog for tracks matching a free-text query.
    #[instrument(skip(self), fields(query = %request.query))]
    pub async fn search_tracks(&self, request: &SearchRequest) -> Result<String> {
        if request.query.trim().is_empty() {
            return Err(SpotifyMcpError::Validation(
                "query must not be empty".to_string(),
            ));
        }

        let limit = clamp_limit(request.limit, SearchRequest::MAX_LIMIT);
        let query = [
            ("q", request.query.clone()),
            ("type", "track".to_string()),
            ("limit", limit.to_string()),
        ];

        let response: SearchResponse = self.get(&["search"], &query).await?;
        debug!("Search returned {} tracks", response.tracks.items.len());
        Ok(format::search_results(&request.query, &response.tracks.items))
    }

    /// Recommend tracks from up to five combined seeds.
    #[instrument(skip(self), fields(seeds = request.seed_count()))]
    pub async fn get_recommendations(&self, request: &RecommendationRequest) -> Result<String> {
        request.validate()?;

        let response: RecommendationsResponse =
            self.get(&["recommendations"], &request.query()).await?;
        debug!("Recommendations returned {} tracks", response.tracks.len());
        Ok(format::recommendations(
            &request.seed_summary(),
            &response.tracks,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use mockito::Matcher;

    const SEARCH_BODY: &str = r#"{"tracks":{"items":[
        {"id":"t1","name":"Song One","uri":"spotify:track:t1","duration_ms":125000,"popularity":55,
         "artists":[{"name":"Band"}],"album":{"name":"Record"}}
    ],"total":1,"limit":50,"offset":0}}"#;

    fn seeds(n: usize, prefix: &str) -> Vec<String> {
        (0..n).map(|i| format!("{}{}", prefix, i)).collect()
    }

    #[tokio::test]
    async fn test_search_clamps_limit_to_fifty() {
        let mut server = mockito::Server::new_async().await;
        let _token = token_mock(&mut server).await;
        let search = server
            .mock("GET", "/v1/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "song one".into()),
                Matcher::UrlEncoded("type".into(), "track".into()),
                Matcher::UrlEncoded("limit".into(), "50".into()),
            ]))
            .with_status(200)
            .with_body(SEARCH_BODY)
            .expect(1)
            .create_async()
            .await;

        let client = client(&server);
        let request = SearchRequest {
            query: "song one".to_string(),
            limit: 75,
        };
        let text = client.search_tracks(&request).await.unwrap();
        assert!(text.contains("1. \"Song One\" by Band"));
        assert!(text.contains("Duration: 2:05"));
        search.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_no_results() {
        let mut server = mockito::Server::new_async().await;
        let _token = token_mock(&mut server).await;
        let _search = server
            .mock("GET", "/v1/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"tracks":{"items":[],"total":0}}"#)
            .create_async()
            .await;

        let client = client(&server);
        let text = client.search_tracks(&SearchRequest::new("nothing")).await.unwrap();
        assert_eq!(text, "No tracks found for \"nothing\".");
    }

    #[tokio::test]
    async fn test_recommendations_reject_bad_seed_counts_offline() {
        let mut server = mockito::Server::new_async().await;
        let token = server
            .mock("POST", "/api/token")
            .expect(0)
            .create_async()
            .await;
        let client = client(&server);

        let none = RecommendationRequest {
            limit: 20,
            ..Default::default()
        };
        assert!(matches!(
            client.get_recommendations(&none).await,
            Err(SpotifyMcpError::Validation(_))
        ));

        let six = RecommendationRequest {
            seed_tracks: seeds(3, "t"),
            seed_artists: seeds(3, "a"),
            limit: 20,
            ..Default::default()
        };
        let err = client.get_recommendations(&six).await.unwrap_err();
        assert!(err.to_string().contains("got 6"));

        token.assert_async().await;
    }

    #[tokio::test]
    async fn test_recommendations_with_five_seeds_proceed() {
        let mut server = mockito::Server::new_async().await;
        let _token = token_mock(&mut server).await;
        let recs = server
            .mock("GET", "/v1/recommendations")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("seed_tracks".into(), "t0,t1".into()),
                Matcher::UrlEncoded("seed_artists".into(), "a0,a1".into()),
                Matcher::UrlEncoded("seed_genres".into(), "jazz".into()),
                Matcher::UrlEncoded("limit".into(), "100".into()),
                Matcher::UrlEncoded("target_energy".into(), "0.8".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"tracks":[{"id":"r1","name":"Rec","uri":"spotify:track:r1","duration_ms":59999}]}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client(&server);
        let request = RecommendationRequest {
            seed_tracks: seeds(2, "t"),
            seed_artists: seeds(2, "a"),
            seed_genres: vec!["jazz".to_string()],
            limit: 500,
            target_energy: Some(0.8),
            ..Default::default()
        };
        let text = client.get_recommendations(&request).await.unwrap();
        assert!(text.starts_with("Seeds: tracks: t0, t1; artists: a0, a1; genres: jazz"));
        assert!(text.contains("Duration: 0:59"));
        recs.assert_async().await;
    }
}
