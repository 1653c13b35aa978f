//! Feed resolution with autodiscovery.
//!
//! A URL is first read as a feed. When that yields no entries and the server
//! did not claim a feed content type, the body is treated as HTML and searched
//! for a feed link (`<link rel="alternate">`, then feed-looking anchors).

use crate::fetcher::Fetcher;
use crate::parser::FeedParser;
use crate::types::{ParsedFeed, Result};
use crate::utils;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;

/// Content-type fragments that make an entry-less parse authoritative.
const FEED_CONTENT_TYPES: [&str; 3] = ["xml", "rss", "atom"];

/// Fragments of a `<link type=...>` that mark a feed.
const FEED_LINK_TYPES: [&str; 3] = ["rss", "xml", "atom"];

/// Fragments of an anchor `href` that suggest a feed.
const FEED_HREF_HINTS: [&str; 3] = ["rss", "feed", "atom"];

#[derive(Debug, Clone)]
pub struct FeedResolver {
    fetcher: Fetcher,
}

impl FeedResolver {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Fetch `url` as a feed, discovering the real feed from an HTML page if
    /// needed. Transport errors propagate; unparseable bodies are empty feeds.
    pub async fn fetch(&self, url: &str, timeout: Duration) -> Result<ParsedFeed> {
        let page = self.fetcher.fetch_page(url, timeout).await?;
        let parsed = FeedParser::parse_lenient(page.body.as_bytes(), &page.url);

        if !parsed.is_empty() {
            return Ok(parsed);
        }

        if page.content_type_mentions(&FEED_CONTENT_TYPES) {
            debug!(url, content_type = ?page.content_type, "feed content type without entries");
            return Ok(parsed);
        }

        match discover_feed_url(&page.body, &page.url) {
            Some(feed_url) => {
                debug!(url, %feed_url, "discovered feed link");
                let feed_page = self.fetcher.fetch_page(&feed_url, timeout).await?;
                Ok(FeedParser::parse_lenient(
                    feed_page.body.as_bytes(),
                    &feed_page.url,
                ))
            }
            None => Ok(parsed),
        }
    }
}

/// Find a feed URL hinted at by an HTML page, resolved against `base_url`.
pub fn discover_feed_url(html: &str, base_url: &str) -> Option<String> {
    let document = Html::parse_document(html);
    alternate_link(&document, base_url).or_else(|| feed_anchor(&document, base_url))
}

fn alternate_link(document: &Html, base_url: &str) -> Option<String> {
    let sel = Selector::parse("link[rel][href]").ok()?;
    document.select(&sel).find_map(|el| {
        let attrs = el.value();
        let rel = attrs.attr("rel")?.to_ascii_lowercase();
        let kind = attrs.attr("type")?.to_ascii_lowercase();
        if rel.contains("alternate") && FEED_LINK_TYPES.iter().any(|t| kind.contains(t)) {
            utils::url::resolve(base_url, attrs.attr("href")?)
        } else {
            None
        }
    })
}

fn feed_anchor(document: &Html, base_url: &str) -> Option<String> {
    let sel = Selector::parse("a[href]").ok()?;
    document.select(&sel).find_map(|el| {
        let href = el.value().attr("href")?;
        let lower = href.to_ascii_lowercase();
        if FEED_HREF_HINTS.iter().any(|hint| lower.contains(hint)) {
            utils::url::resolve(base_url, href)
        } else {
            None
        }
    })
}
