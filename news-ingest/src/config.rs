use crate::sources::{reddit, twitter};
use crate::types::{FetchConfig, IngestError, Result};
use std::str::FromStr;
use url::Url;

const ENV_PREFIX: &str = "NEWS_INGEST_";

/// Reddit's JSON API caps listings at 100 posts.
const MAX_REDDIT_LISTING_LIMIT: u32 = 100;

#[derive(Debug, Clone)]
pub struct RedditConfig {
    /// Base for JSON API requests (`/r/<name>/new.json`, `/comments/<id>.json`).
    pub api_base: String,
    /// Base prepended to post permalinks in emitted records.
    pub link_base: String,
    pub listing_limit: u32,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            api_base: reddit::DEFAULT_API_BASE.to_string(),
            link_base: reddit::DEFAULT_LINK_BASE.to_string(),
            listing_limit: reddit::DEFAULT_LISTING_LIMIT,
        }
    }
}

/// URL lists used by the batch entry point.
#[derive(Debug, Clone)]
pub struct DefaultSources {
    pub web_feeds: Vec<String>,
    pub reddit_communities: Vec<String>,
}

impl Default for DefaultSources {
    fn default() -> Self {
        Self {
            web_feeds: vec!["https://www.bbc.com/news/science_and_environment".to_string()],
            reddit_communities: vec![
                "https://www.reddit.com/r/science/".to_string(),
                "https://www.reddit.com/r/space/".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub fetch: FetchConfig,
    /// Recency window for the feed path. Any value is accepted; a window
    /// longer than the representable time range admits every dated entry.
    pub hours: u32,
    /// URLs processed at once by the orchestrator.
    pub concurrency: usize,
    /// Fill empty feed-entry content from the linked article page.
    pub fetch_linked_articles: bool,
    pub reddit: RedditConfig,
    pub oembed_endpoint: String,
    pub defaults: DefaultSources,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            hours: 24,
            concurrency: 4,
            fetch_linked_articles: true,
            reddit: RedditConfig::default(),
            oembed_endpoint: twitter::DEFAULT_OEMBED_ENDPOINT.to_string(),
            defaults: DefaultSources::default(),
        }
    }
}

impl IngestConfig {
    /// Defaults overridden by `NEWS_INGEST_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each
    /// `NEWS_INGEST_*` key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(format!("{ENV_PREFIX}{name}").as_str())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        if let Some(v) = get("USER_AGENT") {
            config.fetch.user_agent = v;
        }
        if let Some(v) = get("TIMEOUT") {
            config.fetch.timeout_seconds = parse_value("TIMEOUT", &v)?;
        }
        if let Some(v) = get("ARTICLE_TIMEOUT") {
            config.fetch.article_timeout_seconds = parse_value("ARTICLE_TIMEOUT", &v)?;
        }
        if let Some(v) = get("HOURS") {
            config.hours = parse_value("HOURS", &v)?;
        }
        if let Some(v) = get("CONCURRENCY") {
            config.concurrency = parse_value("CONCURRENCY", &v)?;
        }
        if let Some(v) = get("FETCH_LINKED_ARTICLES") {
            config.fetch_linked_articles = parse_bool("FETCH_LINKED_ARTICLES", &v)?;
        }
        if let Some(v) = get("REDDIT_API_BASE") {
            config.reddit.api_base = v;
        }
        if let Some(v) = get("REDDIT_LINK_BASE") {
            config.reddit.link_base = v;
        }
        if let Some(v) = get("REDDIT_LIMIT") {
            config.reddit.listing_limit = parse_value("REDDIT_LIMIT", &v)?;
        }
        if let Some(v) = get("OEMBED_ENDPOINT") {
            config.oembed_endpoint = v;
        }
        if let Some(v) = get("WEB_FEEDS") {
            config.defaults.web_feeds = split_list(&v);
        }
        if let Some(v) = get("REDDIT_COMMUNITIES") {
            config.defaults.reddit_communities = split_list(&v);
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fetch.timeout_seconds == 0 {
            return Err(IngestError::Config("timeout must be at least 1 second".into()));
        }
        if self.fetch.article_timeout_seconds == 0 {
            return Err(IngestError::Config(
                "article timeout must be at least 1 second".into(),
            ));
        }
        if self.concurrency == 0 {
            return Err(IngestError::Config("concurrency must be at least 1".into()));
        }
        if !(1..=MAX_REDDIT_LISTING_LIMIT).contains(&self.reddit.listing_limit) {
            return Err(IngestError::Config(format!(
                "reddit listing limit must be between 1 and {MAX_REDDIT_LISTING_LIMIT}"
            )));
        }
        for (name, value) in [
            ("reddit api base", &self.reddit.api_base),
            ("reddit link base", &self.reddit.link_base),
            ("oembed endpoint", &self.oembed_endpoint),
        ] {
            Url::parse(value)
                .map_err(|e| IngestError::Config(format!("invalid {name} '{value}': {e}")))?;
        }
        Ok(())
    }
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| IngestError::Config(format!("{ENV_PREFIX}{name}='{raw}': {e}")))
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(IngestError::Config(format!(
            "{ENV_PREFIX}{name}='{raw}': expected a boolean"
        ))),
    }
}

/// Comma- or newline-separated list, blanks dropped.
fn split_list(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
