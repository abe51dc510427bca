use std::fs;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::{FeedError, Result};
use crate::model::{MovieRecord, Showtimes};

pub const FEED_VERSION: &str = "1.0";

/// The published document.
#[derive(Debug, Serialize)]
pub struct Feed {
    pub generated_at: String,
    pub expires_at: String,
    pub version: &'static str,
    pub movies: Vec<FeedMovie>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedMovie {
    pub title: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub overview: Option<String>,
    pub rating: Option<f64>,
    pub release_date: Option<String>,
    pub duration: Option<String>,
    pub trailer_url: Option<String>,
    pub showtimes: Showtimes,
}

impl From<&MovieRecord> for FeedMovie {
    fn from(m: &MovieRecord) -> Self {
        Self {
            title: m.display_title().to_string(),
            poster_url: m.enrichment.poster_url.clone().or_else(|| m.poster.clone()),
            backdrop_url: m.enrichment.backdrop_url.clone(),
            overview: m.enrichment.overview.clone().or_else(|| m.synopsis.clone()),
            rating: m.enrichment.rating,
            release_date: m.enrichment.release_date.clone(),
            duration: m.duration.clone(),
            trailer_url: m.trailer.clone(),
            showtimes: m.showtimes.clone(),
        }
    }
}

impl Feed {
    pub fn new(movies: &[MovieRecord], now: DateTime<Utc>, ttl_hours: i64) -> Result<Self> {
        let expires = TimeDelta::try_hours(ttl_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or(FeedError::Ttl(ttl_hours))?;
        Ok(Self {
            generated_at: now.to_rfc3339_opts(SecondsFormat::Micros, true),
            expires_at: expires.to_rfc3339_opts(SecondsFormat::Micros, true),
            version: FEED_VERSION,
            movies: movies.iter().map(FeedMovie::from).collect(),
        })
    }
}

/// Pretty-printed UTF-8; creates the parent directory when missing.
pub fn write_feed(feed: &Feed, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(feed)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| FeedError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, json).map_err(|source| FeedError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Wrote {} movies to {}", feed.movies.len(), path.display());
    Ok(())
}

// ── Tests ──
