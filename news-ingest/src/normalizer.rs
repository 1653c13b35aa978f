use crate::fetcher::{Fetcher, ARTICLE_FETCHES_IN_FLIGHT};
use crate::types::{ordered_authors, NormalizedRecord, ParsedEntry, ParsedFeed};
use crate::utils::text::html_to_text;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::debug;

/// Turns raw feed entries into [`NormalizedRecord`]s.
///
/// Entries without any timestamp are dropped. An entry with no body of its own
/// gets the extracted text of its linked page, unless that is switched off.
#[derive(Debug, Clone)]
pub struct EntryNormalizer {
    fetcher: Fetcher,
    fetch_linked_articles: bool,
}

impl EntryNormalizer {
    pub fn new(fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            fetch_linked_articles: true,
        }
    }

    pub fn with_linked_articles(mut self, enabled: bool) -> Self {
        self.fetch_linked_articles = enabled;
        self
    }

    /// `published`, else `updated`.
    pub fn entry_timestamp(entry: &ParsedEntry) -> Option<DateTime<Utc>> {
        entry.published_at.or(entry.updated_at)
    }

    pub async fn normalize_entry(
        &self,
        entry: &ParsedEntry,
        source: &str,
        fetched_at: DateTime<Utc>,
    ) -> Option<NormalizedRecord> {
        let published = Self::entry_timestamp(entry)?;

        let summary = entry.summary.as_deref().map(html_to_text).unwrap_or_default();
        let mut content = entry.content.as_deref().map(html_to_text).unwrap_or_default();

        if content.is_empty() && self.fetch_linked_articles {
            if let Some(link) = entry.link.as_deref() {
                content = self.fetcher.article_text(link).await.unwrap_or_default();
            }
        }

        Some(NormalizedRecord {
            id: entry.guid.clone(),
            title: entry.title.clone().unwrap_or_default(),
            link: entry.link.clone(),
            published: Some(published),
            summary,
            content,
            authors: ordered_authors(entry.authors.iter().map(String::as_str)),
            tags: entry
                .tags
                .iter()
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect(),
            source: source.to_string(),
            fetched_at,
        })
    }

    /// Normalize every usable entry of `feed`, keeping feed order.
    ///
    /// With `since` set, entries older than it are skipped before any linked
    /// article is fetched for them.
    pub async fn normalize_feed(
        &self,
        feed: &ParsedFeed,
        since: Option<DateTime<Utc>>,
    ) -> Vec<NormalizedRecord> {
        let fetched_at = Utc::now();
        let source = feed
            .title
            .clone()
            .or_else(|| feed.feed_url.clone())
            .unwrap_or_default();

        let candidates: Vec<ParsedEntry> = feed
            .entries
            .iter()
            .filter(|entry| match Self::entry_timestamp(entry) {
                None => {
                    debug!(guid = ?entry.guid, title = ?entry.title, "dropping entry without timestamp");
                    false
                }
                Some(ts) => since.map_or(true, |cutoff| ts >= cutoff),
            })
            .cloned()
            .collect();

        let source = source.as_str();
        stream::iter(candidates)
            .map(|entry| async move { self.normalize_entry(&entry, source, fetched_at).await })
            .buffered(ARTICLE_FETCHES_IN_FLIGHT)
            .filter_map(|record| async move { record })
            .collect()
            .await
    }
}
