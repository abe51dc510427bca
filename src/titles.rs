//! Title cleanup through a generative model.
//!
//! Listing headings carry noise ("CINE NAVALMORAL", "(3D)", "VOSE", dates).
//! All titles go out in one numbered prompt and come back one per line.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde_json::json;
use tracing::{info, warn};

use crate::error::{FeedError, Result};
use crate::model::MovieRecord;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

static NUMBERING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+[.)]\s*").unwrap());

#[async_trait::async_trait]
pub trait TitleNormalizer: Send + Sync {
    fn name(&self) -> &str;

    /// Cleaned titles in input order. May return fewer than asked for.
    async fn clean_titles(&self, titles: &[String]) -> Result<Vec<String>>;
}

pub struct GeminiClient {
    api_key: String,
    models: Vec<String>,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: String, models: Vec<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key,
            models,
            client,
        })
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        let url = format!("{GEMINI_BASE_URL}/{model}:generateContent");
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });

        let resp = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(FeedError::Normalizer(format!(
                "{} returned {}",
                model,
                resp.status()
            )));
        }

        let data: serde_json::Value = resp.json().await?;
        data["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| FeedError::Normalizer(format!("{} returned no text", model)))
    }
}

#[async_trait::async_trait]
impl TitleNormalizer for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn clean_titles(&self, titles: &[String]) -> Result<Vec<String>> {
        let prompt = build_prompt(titles);

        for model in &self.models {
            info!("Cleaning titles with {}", model);
            match self.generate(model, &prompt).await {
                Ok(text) => return Ok(parse_numbered_lines(&text)),
                Err(e) => warn!("{} failed: {}", model, e),
            }
        }

        Err(FeedError::Normalizer("all models failed".into()))
    }
}

pub fn build_prompt(titles: &[String]) -> String {
    let numbered = titles
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}. {}", i + 1, t))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Limpia estos títulos de películas. Elimina \"Cine\", \"Navalmoral\", \"Horarios\", \
         fechas, horas, idiomas y la puntuación sobrante.\n\
         Devuelve SOLO los títulos limpios, uno por línea, numerados igual:\n\n{numbered}"
    )
}

/// One title per non-empty line, numbering stripped.
pub fn parse_numbered_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| NUMBERING_RE.replace(line.trim(), "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Set `cleaned_title` on every movie. Any normalizer failure, or no
/// normalizer at all, leaves the raw title in place.
pub async fn apply_clean_titles(movies: &mut [MovieRecord], normalizer: Option<&dyn TitleNormalizer>) {
    if movies.is_empty() {
        return;
    }

    let cleaned = match normalizer {
        Some(n) => {
            let raw: Vec<String> = movies.iter().map(|m| m.title.clone()).collect();
            match n.clean_titles(&raw).await {
                Ok(cleaned) => cleaned,
                Err(e) => {
                    warn!("Title cleanup via {} failed, keeping raw titles: {}", n.name(), e);
                    Vec::new()
                }
            }
        }
        None => {
            info!("No title normalizer configured, keeping raw titles");
            Vec::new()
        }
    };

    for (i, movie) in movies.iter_mut().enumerate() {
        let title = cleaned.get(i).cloned().unwrap_or_else(|| movie.title.clone());
        if title != movie.title {
            info!("  {} -> {}", movie.title, title);
        }
        movie.cleaned_title = Some(title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `None` simulates a provider outage.
    struct Fixed(Option<Vec<String>>);

    #[async_trait::async_trait]
    impl TitleNormalizer for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn clean_titles(&self, _titles: &[String]) -> Result<Vec<String>> {
            self.0
                .clone()
                .ok_or_else(|| FeedError::Normalizer("quota exceeded".into()))
        }
    }

    fn movies(titles: &[&str]) -> Vec<MovieRecord> {
        titles.iter().map(|t| MovieRecord::new(*t)).collect()
    }

    #[test]
    fn prompt_numbers_titles() {
        let prompt = build_prompt(&[
            "CINE: Avatar 3".to_string(),
            "Zootrópolis 2 (VOSE)".to_string(),
        ]);
        assert!(prompt.contains("1. CINE: Avatar 3\n2. Zootrópolis 2 (VOSE)"));
    }

    #[test]
    fn parses_numbered_answer() {
        let answer = "1. Avatar: Fuego y Ceniza\n\n2) Zootrópolis 2\n  3.La Grazia  ";
        assert_eq!(
            parse_numbered_lines(answer),
            vec!["Avatar: Fuego y Ceniza", "Zootrópolis 2", "La Grazia"]
        );
    }

    #[tokio::test]
    async fn short_answer_falls_back_per_title() {
        let mut m = movies(&["AVATAR (3D)", "LA GRAZIA (VOSE)"]);
        let n = Fixed(Some(vec!["Avatar".into()]));
        apply_clean_titles(&mut m, Some(&n)).await;
        assert_eq!(m[0].display_title(), "Avatar");
        assert_eq!(m[1].display_title(), "LA GRAZIA (VOSE)");
    }

    #[tokio::test]
    async fn failure_keeps_raw_titles() {
        let mut m = movies(&["AVATAR (3D)"]);
        let n = Fixed(None);
        apply_clean_titles(&mut m, Some(&n)).await;
        assert_eq!(m[0].cleaned_title.as_deref(), Some("AVATAR (3D)"));
    }

    #[tokio::test]
    async fn missing_normalizer_keeps_raw_titles() {
        let mut m = movies(&["AVATAR (3D)"]);
        apply_clean_titles(&mut m, None).await;
        assert_eq!(m[0].display_title(), "AVATAR (3D)");
    }
}
