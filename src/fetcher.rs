use std::time::{Duration, Instant};

use reqwest::header;
use spider_client::shapes::request::{ReturnFormat, ReturnFormatHandling};
use spider_client::{RequestParams, Spider};
use tracing::info;

use crate::config::Settings;
use crate::error::{FeedError, Result};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/143.0.0.0 Safari/537.36";

/// Returns the final HTML of a page.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_html(&self, url: &str) -> Result<String>;
}

/// Renders pages through spider.cloud so script-built listings are complete.
pub struct SpiderFetcher {
    spider: Spider,
    timeout: Duration,
}

impl SpiderFetcher {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let spider = Spider::new(Some(api_key)).map_err(|e| FeedError::Fetch {
            url: String::new(),
            reason: format!("failed to create Spider client: {}", e),
        })?;
        Ok(Self { spider, timeout })
    }
}

#[async_trait::async_trait]
impl PageFetcher for SpiderFetcher {
    fn name(&self) -> &str {
        "spider"
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let params = RequestParams {
            return_format: Some(ReturnFormatHandling::Single(ReturnFormat::Raw)),
            ..Default::default()
        };

        let response = tokio::time::timeout(
            self.timeout,
            self.spider.scrape_url(url, Some(params), "application/json"),
        )
        .await
        .map_err(|_| FeedError::Timeout(self.timeout.as_secs()))?
        .map_err(|e| FeedError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let parsed: serde_json::Value = match response.as_str() {
            Some(s) => serde_json::from_str(s).unwrap_or(response.clone()),
            None => response,
        };

        parsed
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|obj| obj.get("content"))
            .and_then(|c| c.as_str())
            .filter(|c| !c.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| FeedError::Fetch {
                url: url.to_string(),
                reason: "no content in spider response".into(),
            })
    }
}

/// Plain GET for pages that render server-side.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .header(header::ACCEPT_LANGUAGE, "es-ES,es;q=0.9")
            .send()
            .await
            .map_err(|e| FeedError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(FeedError::Fetch {
                url: url.to_string(),
                reason: format!("status {}", resp.status()),
            });
        }

        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Err(FeedError::Fetch {
                url: url.to_string(),
                reason: "empty body".into(),
            });
        }
        Ok(body)
    }
}

/// Spider when an API key is configured, plain HTTP otherwise.
pub fn from_settings(settings: &Settings) -> Result<Box<dyn PageFetcher>> {
    match settings.spider_api_key.clone().filter(|k| !k.is_empty()) {
        Some(key) => Ok(Box::new(SpiderFetcher::new(key, settings.fetch_timeout())?)),
        None => Ok(Box::new(HttpFetcher::new(settings.fetch_timeout())?)),
    }
}

/// Fetch with timing, logging the byte count.
pub async fn fetch_page(fetcher: &dyn PageFetcher, url: &str) -> Result<String> {
    info!("Fetching {} via {}", url, fetcher.name());
    let start = Instant::now();
    let html = fetcher.fetch_html(url).await?;
    info!(
        "Fetched {} bytes in {:.1}s",
        html.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(html)
}
