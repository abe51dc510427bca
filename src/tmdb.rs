//! TMDB (The Movie Database) lookups.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::error::{FeedError, Result};
use crate::model::MovieRecord;

const BASE_URL: &str = "https://api.themoviedb.org/3";
const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
const YOUTUBE_WATCH: &str = "https://www.youtube.com/watch?v=";

/// What a provider knows about one movie.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieDetails {
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub overview: Option<String>,
    pub rating: Option<f64>,
    pub release_date: Option<String>,
    pub runtime_minutes: Option<i64>,
    pub trailer_url: Option<String>,
}

#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Best match for a title, `None` when the search comes back empty.
    async fn lookup(&self, title: &str, year: Option<&str>) -> Result<Option<MovieDetails>>;
}

enum Auth {
    Bearer(String),
    ApiKey(String),
}

pub struct TmdbClient {
    auth: Auth,
    language: String,
    client: reqwest::Client,
}

impl TmdbClient {
    /// Prefers the v4 read token; falls back to the v3 api key.
    pub fn new(
        read_token: Option<String>,
        api_key: Option<String>,
        language: String,
        timeout: Duration,
    ) -> Option<Result<Self>> {
        let auth = match (
            read_token.filter(|t| !t.is_empty()),
            api_key.filter(|k| !k.is_empty()),
        ) {
            (Some(token), _) => Auth::Bearer(token),
            (None, Some(key)) => Auth::ApiKey(key),
            (None, None) => return None,
        };

        Some(
            reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map(|client| Self {
                    auth,
                    language,
                    client,
                })
                .map_err(FeedError::from),
        )
    }

    async fn get_json(&self, path: &str, params: &[(&str, &str)]) -> Result<serde_json::Value> {
        let url = format!("{BASE_URL}{path}");
        debug!(url = %url, "TMDB request");

        let mut req = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("language", self.language.as_str())])
            .query(params);
        req = match &self.auth {
            Auth::Bearer(token) => req.bearer_auth(token),
            Auth::ApiKey(key) => req.query(&[("api_key", key.as_str())]),
        };

        let resp = req.send().await?;
        if !resp.status().is_success() {
            return Err(FeedError::Metadata(format!("TMDB returned {}", resp.status())));
        }

        resp.json()
            .await
            .map_err(|e| FeedError::Metadata(format!("parse JSON: {e}")))
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbClient {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn lookup(&self, title: &str, year: Option<&str>) -> Result<Option<MovieDetails>> {
        let mut params = vec![("query", title)];
        if let Some(y) = year {
            params.push(("year", y));
        }

        let search = self.get_json("/search/movie", &params).await?;
        let Some(id) = search["results"][0]["id"].as_u64() else {
            return Ok(None);
        };

        let details = self
            .get_json(&format!("/movie/{id}"), &[("append_to_response", "videos")])
            .await?;

        Ok(Some(parse_movie_details(&details)))
    }
}

fn parse_movie_details(data: &serde_json::Value) -> MovieDetails {
    let trailer_url = data["videos"]["results"]
        .as_array()
        .into_iter()
        .flatten()
        .find(|v| v["type"] == "Trailer" && v["site"] == "YouTube")
        .and_then(|v| v["key"].as_str())
        .map(|key| format!("{YOUTUBE_WATCH}{key}"));

    MovieDetails {
        poster_url: data["poster_path"]
            .as_str()
            .map(|p| format!("{IMAGE_BASE}/w500{p}")),
        backdrop_url: data["backdrop_path"]
            .as_str()
            .map(|p| format!("{IMAGE_BASE}/w780{p}")),
        overview: data["overview"]
            .as_str()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string()),
        rating: data["vote_average"].as_f64(),
        release_date: data["release_date"].as_str().map(|s| s.to_string()),
        runtime_minutes: data["runtime"].as_i64(),
        trailer_url,
    }
}

/// Fold provider details into a parsed record. Scraped duration and trailer
/// win over the provider's; everything else comes from the provider.
pub fn merge_details(movie: &mut MovieRecord, details: MovieDetails) {
    let e = &mut movie.enrichment;
    if details.poster_url.is_some() {
        e.poster_url = details.poster_url;
    }
    if details.backdrop_url.is_some() {
        e.backdrop_url = details.backdrop_url;
    }
    if details.overview.is_some() {
        e.overview = details.overview;
    }
    e.rating = details.rating;
    e.release_date = details.release_date;

    if movie.duration.is_none() {
        movie.duration = details
            .runtime_minutes
            .filter(|r| *r > 0)
            .map(|r| format!("{r} min"));
    }
    if movie.trailer.is_none() {
        movie.trailer = details.trailer_url;
    }
}

/// Look every movie up by its display title. A failed or empty lookup only
/// costs that movie its enrichment.
pub async fn enrich_movies(movies: &mut [MovieRecord], provider: &dyn MetadataProvider) -> usize {
    let pb = ProgressBar::new(movies.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("=> "));
    }

    let mut enriched = 0usize;
    for movie in movies.iter_mut() {
        let title = movie.display_title().to_string();
        pb.set_message(title.clone());

        match provider.lookup(&title, movie.year.as_deref()).await {
            Ok(Some(details)) => {
                merge_details(movie, details);
                enriched += 1;
                debug!("  {} enriched", title);
            }
            Ok(None) => warn!("No {} match for {}", provider.name(), title),
            Err(e) => warn!("{} lookup failed for {}: {}", provider.name(), title, e),
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!("Enriched {}/{} movies via {}", enriched, movies.len(), provider.name());
    enriched
}
