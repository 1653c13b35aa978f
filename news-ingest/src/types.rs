use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Canonical record emitted by every source.
///
/// Nullability per field:
/// - `published` is always set for feed entries (entries without a timestamp
///   never become records), for Reddit posts and for the raw HTML fallback.
///   It is always `None` for Twitter/X statuses.
/// - `id` is `None` for Twitter/X statuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub id: Option<String>,
    pub title: String,
    pub link: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub summary: String,
    pub content: String,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
    pub source: String,
    pub fetched_at: DateTime<Utc>,
}

/// Deduplicate author names, keeping first-occurrence order and skipping blanks.
pub fn ordered_authors<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names
        .into_iter()
        .map(|name| name.into().trim().to_string())
        .filter(|name| !name.is_empty())
        .unique()
        .collect()
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    /// Timeout for best-effort article fetches made while filling in content.
    pub article_timeout_seconds: u64,
    pub follow_redirects: bool,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "news-ingest/0.1 (+https://example.local)".to_string(),
            timeout_seconds: 10,
            article_timeout_seconds: 5,
            follow_redirects: true,
            max_redirects: 5,
        }
    }
}

/// A feed document reduced to what normalization needs.
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    pub title: Option<String>,
    /// URL the feed document was read from.
    pub feed_url: Option<String>,
    pub entries: Vec<ParsedEntry>,
}

impl ParsedFeed {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A raw feed entry. Every field is optional; the normalizer decides what is
/// mandatory.
#[derive(Debug, Clone, Default)]
pub struct ParsedEntry {
    pub guid: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_authors_dedupes_in_first_seen_order() {
        let authors = ordered_authors(["Jane Doe", "John Roe", " Jane Doe ", "", "Ann"]);
        assert_eq!(authors, vec!["Jane Doe", "John Roe", "Ann"]);
    }

    #[test]
    fn twitter_style_record_serializes_null_published() {
        let record = NormalizedRecord {
            id: None,
            title: "hello".into(),
            link: Some("https://x.com/a/status/1".into()),
            published: None,
            summary: "hello".into(),
            content: "hello".into(),
            authors: vec!["a".into()],
            tags: vec![],
            source: "x".into(),
            fetched_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["published"].is_null());
        assert!(json["id"].is_null());
        assert_eq!(json["source"], "x");
    }
}
