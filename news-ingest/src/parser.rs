use crate::types::{IngestError, ParsedEntry, ParsedFeed, Result};
use feed_rs::model::{Entry, Link};
use feed_rs::parser;
use tracing::debug;

/// Thin adapter over `feed-rs` producing [`ParsedFeed`] values.
pub struct FeedParser;

impl FeedParser {
    /// Parse an RSS/Atom/JSON feed document.
    pub fn parse_feed(content: &[u8]) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content)
            .map_err(|e| IngestError::Parse(format!("Failed to parse feed: {}", e)))?;

        let title = feed
            .title
            .map(|t| t.content.trim().to_string())
            .filter(|t| !t.is_empty());
        let entries = feed.entries.into_iter().map(Self::parse_entry).collect();

        Ok(ParsedFeed {
            title,
            feed_url: None,
            entries,
        })
    }

    /// Like [`FeedParser::parse_feed`], but a document that is not a feed is
    /// simply an empty result.
    pub fn parse_lenient(content: &[u8], feed_url: &str) -> ParsedFeed {
        let mut parsed = match Self::parse_feed(content) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(feed_url, error = %e, "body is not a feed document");
                ParsedFeed::default()
            }
        };
        parsed.feed_url = Some(feed_url.to_string());
        parsed
    }

    fn parse_entry(entry: Entry) -> ParsedEntry {
        let guid = Some(entry.id.trim().to_string()).filter(|id| !id.is_empty());
        let title = entry.title.map(|t| t.content.trim().to_string());
        let link = primary_link(&entry.links);
        let summary = entry.summary.map(|s| s.content);
        let content = entry.content.and_then(|c| c.body);

        let authors = entry
            .authors
            .into_iter()
            .map(|person| person.name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        let tags = entry
            .categories
            .into_iter()
            .filter_map(|category| {
                let term = category.term.trim().to_string();
                if !term.is_empty() {
                    Some(term)
                } else {
                    category
                        .label
                        .map(|label| label.trim().to_string())
                        .filter(|label| !label.is_empty())
                }
            })
            .collect();

        ParsedEntry {
            guid,
            title,
            link,
            summary,
            content,
            authors,
            tags,
            published_at: entry.published,
            updated_at: entry.updated,
        }
    }
}

/// The entry's alternate link if it has one, else its first link.
fn primary_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| l.rel.as_deref().map_or(true, |rel| rel == "alternate"))
        .or_else(|| links.first())
        .map(|l| l.href.trim().to_string())
        .filter(|href| !href.is_empty())
}
