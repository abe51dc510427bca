mod config;
mod error;
mod feed;
mod fetcher;
mod model;
mod parser;
mod pipeline;
mod sorter;
mod titles;
mod tmdb;

use std::path::PathBuf;
use std::time::Instant;

use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::Settings;
use crate::error::FeedError;
use crate::pipeline::Pipeline;
use crate::titles::{GeminiClient, TitleNormalizer};
use crate::tmdb::{MetadataProvider, TmdbClient};

#[derive(Parser)]
#[command(name = "cinema_feed", about = "Cinema listing scraper and JSON feed builder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, parse, enrich and write the feed
    Run {
        /// Listing page URL (default: CINEMA_URL or built-in)
        #[arg(short, long)]
        url: Option<String>,
        /// Feed output path (default: OUTPUT_FILE or cinema_data.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse a saved HTML page and print what was found
    Parse {
        /// Saved listing page
        file: PathBuf,
    },
    /// Fetch the listing page and save its HTML
    Fetch {
        /// Listing page URL (default: CINEMA_URL or built-in)
        #[arg(short, long)]
        url: Option<String>,
        /// Where to save the HTML
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { url, output } => run(Settings::load(url, output)?).await,
        Commands::Parse { file } => {
            let html = std::fs::read_to_string(&file)?;
            let mut movies = parser::parse_listing(&html);
            if movies.is_empty() {
                anyhow::bail!("no movies found in {}", file.display());
            }
            sorter::sort_all(&mut movies, Utc::now().year());
            print_movies(&movies);
            Ok(())
        }
        Commands::Fetch { url, output } => {
            let settings = Settings::load(url, None)?;
            let fetcher = fetcher::from_settings(&settings)?;
            let html = fetcher::fetch_page(fetcher.as_ref(), &settings.cinema_url).await?;
            std::fs::write(&output, &html)?;
            println!("Saved {} bytes to {}", html.len(), output.display());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    let fetcher = fetcher::from_settings(&settings)?;

    let gemini = match settings.gemini_api_key.clone().filter(|k| !k.is_empty()) {
        Some(key) => Some(GeminiClient::new(
            key,
            settings.gemini_models(),
            settings.request_timeout(),
        )?),
        None => None,
    };
    let tmdb = TmdbClient::new(
        settings.tmdb_read_token.clone(),
        settings.tmdb_api_key.clone(),
        settings.tmdb_language.clone(),
        settings.request_timeout(),
    )
    .transpose()?;

    let pipeline = Pipeline {
        fetcher: fetcher.as_ref(),
        normalizer: gemini.as_ref().map(|g| g as &dyn TitleNormalizer),
        metadata: tmdb.as_ref().map(|t| t as &dyn MetadataProvider),
    };

    let feed = match pipeline
        .build_feed(&settings.cinema_url, Utc::now(), settings.feed_ttl_hours)
        .await
    {
        Ok(feed) => feed,
        Err(FeedError::NoMovies) => anyhow::bail!("no movies found at {}", settings.cinema_url),
        Err(e) => return Err(e.into()),
    };

    feed::write_feed(&feed, &settings.output_file)?;
    info!("Feed expires at {}", feed.expires_at);
    println!(
        "Wrote {} movies to {}",
        feed.movies.len(),
        settings.output_file.display()
    );
    Ok(())
}

fn print_movies(movies: &[model::MovieRecord]) {
    println!(
        "{:>3} | {:<32} | {:<9} | {:<4} | {:>4} | {:>5} | {:<3} | {:<3}",
        "#", "Title", "Duration", "Year", "Days", "Times", "Syn", "Trl"
    );
    println!("{}", "-".repeat(84));

    for (i, m) in movies.iter().enumerate() {
        let times: usize = m.showtimes.iter().map(|(_, t)| t.len()).sum();
        println!(
            "{:>3} | {:<32} | {:<9} | {:<4} | {:>4} | {:>5} | {:<3} | {:<3}",
            i + 1,
            truncate(&m.title, 32),
            m.duration.as_deref().unwrap_or("-"),
            m.year.as_deref().unwrap_or("-"),
            m.showtimes.len(),
            times,
            if m.synopsis.is_some() { "yes" } else { "-" },
            if m.trailer.is_some() { "yes" } else { "-" },
        );
    }

    println!("\n--- Showtimes ---");
    for m in movies {
        println!("  {}", truncate(&m.title, 48));
        for (day, times) in m.showtimes.iter() {
            println!("    {}: {}", day, times.join(", "));
        }
    }

    println!("\n{} movies", movies.len());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
