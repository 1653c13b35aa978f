#![allow(dead_code)]

use chrono::{DateTime, Utc};
use news_ingest::{FetchConfig, Fetcher};
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn fetcher() -> Fetcher {
    Fetcher::new(FetchConfig {
        user_agent: "news-ingest-test/1.0".to_string(),
        timeout_seconds: 5,
        article_timeout_seconds: 2,
        ..FetchConfig::default()
    })
    .expect("build fetcher")
}

pub const RSS_CONTENT_TYPE: &str = "application/rss+xml";
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// One `<item>`; `published` becomes an RFC 2822 `pubDate`.
pub fn rss_item(title: &str, link: &str, published: Option<DateTime<Utc>>) -> String {
    let pub_date = published
        .map(|ts| format!("<pubDate>{}</pubDate>", ts.to_rfc2822()))
        .unwrap_or_default();
    format!(
        "<item><title>{title}</title><link>{link}</link><guid>{link}</guid>{pub_date}\
         <description><![CDATA[<p>About {title}</p>]]></description></item>"
    )
}

pub fn rss_feed(title: &str, items: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>{title}</title><link>http://example.com/</link>
<description>test feed</description>{}</channel></rss>"#,
        items.concat()
    )
}

pub fn html_page(head: &str, body: &str) -> String {
    format!("<!DOCTYPE html><html><head><title>Page</title>{head}</head><body>{body}</body></html>")
}
