//! Command-line definitions shared by the `news-ingest` and `ingest-defaults`
//! binaries.
//!
//! Flags override `NEWS_INGEST_*` environment settings, which override the
//! built-in defaults of [`IngestConfig`].

use crate::config::IngestConfig;
use clap::{Args, Parser};
use std::io::{self, BufRead};
use std::path::PathBuf;

/// Options common to both binaries.
#[derive(Args, Debug, Clone, Default)]
pub struct FetchArgs {
    /// Recency window in hours for feed entries (default 24)
    #[arg(long, value_name = "HOURS")]
    pub hours: Option<u32>,

    /// Per-request timeout in seconds (default 10)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

impl FetchArgs {
    pub fn apply(&self, config: &mut IngestConfig) {
        if let Some(hours) = self.hours {
            config.hours = hours;
        }
        if let Some(timeout) = self.timeout {
            config.fetch.timeout_seconds = timeout;
        }
    }
}

/// Fetch recent items from feeds, pages, Reddit and Twitter/X into one JSON file.
///
/// Without `--url`, URLs are read one per line from stdin.
#[derive(Parser, Debug)]
#[command(name = "news-ingest", version)]
pub struct Cli {
    /// Source URL: feed, web page, subreddit, Reddit post or tweet (repeatable)
    #[arg(long = "url", value_name = "URL")]
    pub urls: Vec<String>,

    #[command(flatten)]
    pub fetch: FetchArgs,

    /// Output JSON file
    #[arg(long, env = "NEWS_INGEST_OUT", default_value = "recent.json")]
    pub out: PathBuf,

    /// Number of URLs processed at once (default 4)
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Do not fetch linked articles for feed entries without content
    #[arg(long)]
    pub no_article_fallback: bool,
}

impl Cli {
    pub fn apply(&self, config: &mut IngestConfig) {
        self.fetch.apply(config);
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if self.no_article_fallback {
            config.fetch_linked_articles = false;
        }
    }

    /// `--url` values, trimmed, blanks dropped.
    pub fn urls(&self) -> Vec<String> {
        self.urls
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Run the configured default web feeds and subreddits into one JSON file.
#[derive(Parser, Debug)]
#[command(name = "ingest-defaults", version)]
pub struct DefaultsCli {
    #[command(flatten)]
    pub fetch: FetchArgs,

    /// Output JSON file
    #[arg(long, env = "NEWS_INGEST_DEFAULTS_OUT", default_value = "combined_recent.json")]
    pub out: PathBuf,
}

/// Read URLs one per line, trimming each. With `stop_at_blank` (interactive
/// use) the first empty line ends input; otherwise blank lines are skipped.
pub fn read_urls<R: BufRead>(reader: R, stop_at_blank: bool) -> io::Result<Vec<String>> {
    let mut urls = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if stop_at_blank {
                break;
            }
            continue;
        }
        urls.push(trimmed.to_string());
    }
    Ok(urls)
}
