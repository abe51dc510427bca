use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("fetch timed out after {0}s")]
    Timeout(u64),
    #[error("feed TTL of {0}h is out of range")]
    Ttl(i64),
    #[error("no movies found in listing")]
    NoMovies,
    #[error("title normalizer error: {0}")]
    Normalizer(String),
    #[error("metadata provider error: {0}")]
    Metadata(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("serialize feed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, FeedError>;
