use crate::extract;
use crate::types::{FetchConfig, IngestError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect, Client, Response};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::debug;

/// Upper bound on concurrent best-effort article fetches within one source.
pub const ARTICLE_FETCHES_IN_FLIGHT: usize = 4;

/// A successfully fetched (2xx) page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects.
    pub url: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl FetchedPage {
    /// True when the `Content-Type` header mentions any of `needles`.
    pub fn content_type_mentions(&self, needles: &[&str]) -> bool {
        match &self.content_type {
            Some(content_type) => {
                let lower = content_type.to_ascii_lowercase();
                needles.iter().any(|needle| lower.contains(needle))
            }
            None => false,
        }
    }
}

/// Per-run HTTP client shared by every source. Cloning is cheap and shares
/// the connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let redirect_policy = if config.follow_redirects {
            redirect::Policy::limited(config.max_redirects)
        } else {
            redirect::Policy::none()
        };

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(redirect_policy)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds)
    }

    pub fn article_timeout(&self) -> Duration {
        Duration::from_secs(self.config.article_timeout_seconds)
    }

    /// GET `url`. Non-2xx statuses are errors; no retries.
    pub async fn fetch_page(&self, url: &str, timeout: Duration) -> Result<FetchedPage> {
        let start_time = Instant::now();
        let response = self.client.get(url).timeout(timeout).send().await?;
        let response = ensure_success(url, response)?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.text().await?;

        debug!(
            url,
            status,
            bytes = body.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "fetched page"
        );

        Ok(FetchedPage {
            url: final_url,
            content_type,
            body,
        })
    }

    /// GET `url` with `query` and decode the JSON body into `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<T> {
        let response = self
            .client
            .get(url)
            .query(query)
            .timeout(timeout)
            .send()
            .await?;
        let response = ensure_success(url, response)?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Raw HTML of an article page, using the shorter article timeout.
    pub async fn fetch_full_content(&self, url: &str) -> Result<String> {
        debug!("Fetching full content from: {}", url);
        let page = self.fetch_page(url, self.article_timeout()).await?;
        Ok(page.body)
    }

    /// Best-effort main text of the page at `url`. Any failure is "unavailable".
    pub async fn article_text(&self, url: &str) -> Option<String> {
        match self.fetch_full_content(url).await {
            Ok(html) => extract::extract(&html).text,
            Err(e) => {
                debug!(url, error = %e, "article text unavailable");
                None
            }
        }
    }
}

fn ensure_success(url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(IngestError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}
