use std::time::Instant;

use chrono::{DateTime, Datelike, Utc};
use tracing::info;

use crate::error::{FeedError, Result};
use crate::feed::Feed;
use crate::fetcher::{self, PageFetcher};
use crate::model::MovieRecord;
use crate::parser;
use crate::sorter;
use crate::titles::{self, TitleNormalizer};
use crate::tmdb::{self, MetadataProvider};

/// Collaborators for one run. Normalizer and metadata are optional; without
/// them the feed carries raw titles and scraped fields only.
pub struct Pipeline<'a> {
    pub fetcher: &'a dyn PageFetcher,
    pub normalizer: Option<&'a dyn TitleNormalizer>,
    pub metadata: Option<&'a dyn MetadataProvider>,
}

impl Pipeline<'_> {
    /// fetch → parse → clean titles → enrich → sort → feed.
    pub async fn build_feed(&self, url: &str, now: DateTime<Utc>, ttl_hours: i64) -> Result<Feed> {
        let html = fetcher::fetch_page(self.fetcher, url).await?;
        let movies = self.process(&html, now).await?;
        Feed::new(&movies, now, ttl_hours)
    }

    /// Everything after the fetch.
    pub async fn process(&self, html: &str, now: DateTime<Utc>) -> Result<Vec<MovieRecord>> {
        let t_parse = Instant::now();
        let mut movies = parser::parse_listing(html);
        if movies.is_empty() {
            return Err(FeedError::NoMovies);
        }
        info!(
            "Parsed {} movies in {:.1}s",
            movies.len(),
            t_parse.elapsed().as_secs_f64()
        );

        titles::apply_clean_titles(&mut movies, self.normalizer).await;

        match self.metadata {
            Some(provider) => {
                tmdb::enrich_movies(&mut movies, provider).await;
            }
            None => info!("No metadata provider configured, skipping enrichment"),
        }

        sorter::sort_all(&mut movies, now.year());
        Ok(movies)
    }
}

// ── Tests ──
