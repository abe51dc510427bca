use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CINEMA_URL: &str = "https://tietarteve.com/cine-navalmoral/";
const DEFAULT_OUTPUT_FILE: &str = "cinema_data.json";
const DEFAULT_GEMINI_MODELS: &str = "gemini-3-flash-preview,gemini-2.0-flash,gemini-1.5-flash";
const CONFIG_FILE: &str = "cinema_feed";

/// Runtime settings: defaults, then `cinema_feed.toml`, then environment,
/// then CLI overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub cinema_url: String,
    pub output_file: PathBuf,
    pub spider_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    gemini_models: String,
    pub tmdb_read_token: Option<String>,
    pub tmdb_api_key: Option<String>,
    pub tmdb_language: String,
    pub fetch_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub feed_ttl_hours: i64,
}

impl Settings {
    pub fn load(url: Option<String>, output: Option<PathBuf>) -> Result<Self> {
        let settings = Config::builder()
            .set_default("cinema_url", DEFAULT_CINEMA_URL)?
            .set_default("output_file", DEFAULT_OUTPUT_FILE)?
            .set_default("gemini_models", DEFAULT_GEMINI_MODELS)?
            .set_default("tmdb_language", "es-ES")?
            .set_default("fetch_timeout_secs", 30_i64)?
            .set_default("request_timeout_secs", 10_i64)?
            .set_default("feed_ttl_hours", 24_i64)?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::default())
            .set_override_option("cinema_url", url)?
            .set_override_option(
                "output_file",
                output.map(|p| p.to_string_lossy().into_owned()),
            )?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn gemini_models(&self) -> Vec<String> {
        self.gemini_models
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
