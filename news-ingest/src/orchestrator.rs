use crate::classifier::{self, SourceKind};
use crate::config::{DefaultSources, IngestConfig};
use crate::fetcher::Fetcher;
use crate::output;
use crate::sources::{RedditClient, TwitterOEmbedClient, WebSource};
use crate::traits::PullSource;
use crate::types::{NormalizedRecord, Result};
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Routes each input URL to its source and merges the results in input order.
/// Sources receive the trimmed input as typed and add a scheme themselves
/// where they need one.
///
/// A URL whose source fails (or whose worker panics) is logged and contributes
/// nothing; the other URLs are unaffected.
#[derive(Clone)]
pub struct IngestionOrchestrator {
    reddit: Arc<dyn PullSource>,
    twitter: Arc<dyn PullSource>,
    web: Arc<dyn PullSource>,
    concurrency: usize,
}

impl IngestionOrchestrator {
    /// Build every source around one shared HTTP client.
    pub fn new(config: &IngestConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = Fetcher::new(config.fetch.clone())?;

        let reddit = RedditClient::new(fetcher.clone())
            .with_api_base(config.reddit.api_base.as_str())
            .with_link_base(config.reddit.link_base.as_str())
            .with_listing_limit(config.reddit.listing_limit);
        let twitter =
            TwitterOEmbedClient::new(fetcher.clone()).with_endpoint(config.oembed_endpoint.as_str());
        let web = WebSource::new(fetcher, config.hours)
            .with_linked_articles(config.fetch_linked_articles);

        Ok(Self::from_sources(
            Arc::new(reddit),
            Arc::new(twitter),
            Arc::new(web),
            config.concurrency,
        ))
    }

    pub fn from_sources(
        reddit: Arc<dyn PullSource>,
        twitter: Arc<dyn PullSource>,
        web: Arc<dyn PullSource>,
        concurrency: usize,
    ) -> Self {
        Self {
            reddit,
            twitter,
            web,
            concurrency: concurrency.max(1),
        }
    }

    fn source_for(&self, kind: SourceKind) -> Arc<dyn PullSource> {
        match kind {
            SourceKind::Reddit => self.reddit.clone(),
            SourceKind::Twitter => self.twitter.clone(),
            SourceKind::Web => self.web.clone(),
        }
    }

    pub async fn collect_from_urls(&self, urls: &[String]) -> Vec<NormalizedRecord> {
        let run_id = Uuid::new_v4();
        let urls: Vec<String> = urls
            .iter()
            .map(|raw| raw.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();
        let total = urls.len();

        async move {
            info!("Processing {} source(s)", total);

            let per_url: Vec<Vec<NormalizedRecord>> = stream::iter(urls.into_iter().enumerate())
                .map(|(idx, url)| self.collect_one(idx + 1, total, url))
                .buffered(self.concurrency)
                .collect()
                .await;

            let combined: Vec<NormalizedRecord> = per_url.into_iter().flatten().collect();
            info!(records = combined.len(), "ingestion run finished");
            combined
        }
        .instrument(info_span!("ingest_run", %run_id))
        .await
    }

    async fn collect_one(&self, idx: usize, total: usize, url: String) -> Vec<NormalizedRecord> {
        let source = self.source_for(classifier::classify(&url));
        let source_name = source.source_name();
        info!("[{}/{}] {}", idx, total, url);

        let worker = {
            let url = url.clone();
            async move { source.pull(&url).await }.in_current_span()
        };

        match tokio::spawn(worker).await {
            Ok(Ok(records)) => {
                info!(url = %url, source = source_name, "fetched {} items", records.len());
                records
            }
            Ok(Err(e)) => {
                warn!(url = %url, source = source_name, "skipped source: {}", e);
                Vec::new()
            }
            Err(e) => {
                error!(url = %url, source = source_name, "source worker failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Collect from `urls` and write them to `out`. Returns the record count.
    pub async fn process_url_list(&self, urls: &[String], out: &Path) -> Result<usize> {
        let records = self.collect_from_urls(urls).await;
        output::write_records(out, &records).await
    }

    /// Collect the default web feeds, then the default subreddits, and write
    /// the combined result to `out`.
    pub async fn run_defaults(&self, defaults: &DefaultSources, out: &Path) -> Result<usize> {
        let mut combined = Vec::new();

        if !defaults.web_feeds.is_empty() {
            let records = self.collect_from_urls(&defaults.web_feeds).await;
            info!("Collected {} items from web feeds", records.len());
            combined.extend(records);
        }

        if !defaults.reddit_communities.is_empty() {
            let records = self.collect_from_urls(&defaults.reddit_communities).await;
            info!("Collected {} items from reddit communities", records.len());
            combined.extend(records);
        }

        output::write_records(out, &combined).await
    }
}
