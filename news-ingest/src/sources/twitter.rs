use crate::classifier;
use crate::fetcher::Fetcher;
use crate::traits::PullSource;
use crate::types::{NormalizedRecord, Result};
use crate::utils::text::{html_to_text, truncate_chars};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_OEMBED_ENDPOINT: &str = "https://publish.twitter.com/oembed";

const TITLE_CHARS: usize = 120;

#[derive(Debug, Default, Deserialize)]
struct OEmbedResponse {
    html: Option<String>,
    author_name: Option<String>,
    author_url: Option<String>,
}

/// Single Twitter/X statuses through the public oEmbed endpoint.
///
/// oEmbed carries no reliable timestamp, so records from here always have a
/// null `published`.
#[derive(Debug, Clone)]
pub struct TwitterOEmbedClient {
    fetcher: Fetcher,
    endpoint: String,
}

impl TwitterOEmbedClient {
    pub fn new(fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            endpoint: DEFAULT_OEMBED_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub async fn fetch_status(&self, tweet_url: &str, timeout: Duration) -> Option<NormalizedRecord> {
        let response: OEmbedResponse = match self
            .fetcher
            .get_json(&self.endpoint, &[("url", tweet_url)], timeout)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!(tweet_url, error = %e, "oembed lookup failed");
                return None;
            }
        };

        let text = response.html.as_deref().map(html_to_text).unwrap_or_default();
        let author = response
            .author_name
            .filter(|name| !name.trim().is_empty())
            .or(response.author_url.filter(|url| !url.trim().is_empty()));

        Some(NormalizedRecord {
            id: None,
            title: truncate_chars(&text, TITLE_CHARS),
            link: Some(tweet_url.to_string()),
            published: None,
            summary: text.clone(),
            content: text,
            authors: author.into_iter().collect(),
            tags: Vec::new(),
            source: "x".to_string(),
            fetched_at: Utc::now(),
        })
    }
}

#[async_trait]
impl PullSource for TwitterOEmbedClient {
    fn source_name(&self) -> &'static str {
        "twitter"
    }

    async fn pull(&self, url: &str) -> Result<Vec<NormalizedRecord>> {
        let url = classifier::normalize_input(url);
        let record = self.fetch_status(&url, self.fetcher.default_timeout()).await;
        Ok(record.into_iter().collect())
    }
}
