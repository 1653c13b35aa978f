use crate::classifier::{self, RedditTarget};
use crate::fetcher::{Fetcher, ARTICLE_FETCHES_IN_FLIGHT};
use crate::traits::PullSource;
use crate::types::{ordered_authors, NormalizedRecord, Result};
use crate::utils;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://www.reddit.com";
pub const DEFAULT_LINK_BASE: &str = "https://reddit.com";
pub const DEFAULT_LISTING_LIMIT: u32 = 25;

const POST_SOURCE: &str = "reddit:post";

#[derive(Debug, Default, Deserialize)]
struct Listing {
    #[serde(default)]
    data: ListingData,
}

#[derive(Debug, Default, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Default, Deserialize)]
struct Child {
    #[serde(default)]
    data: RedditPost,
}

#[derive(Debug, Default, Deserialize)]
struct RedditPost {
    id: Option<String>,
    title: Option<String>,
    permalink: Option<String>,
    url: Option<String>,
    selftext: Option<String>,
    author: Option<String>,
    link_flair_text: Option<String>,
    created_utc: Option<f64>,
    is_self: Option<bool>,
}

/// A post page returns `[post listing, comment listing]`; some endpoints
/// return the post listing alone.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PostResponse {
    Thread(Vec<Listing>),
    Single(Listing),
}

impl PostResponse {
    fn into_first_post(self) -> Option<RedditPost> {
        let listing = match self {
            PostResponse::Thread(listings) => listings.into_iter().next()?,
            PostResponse::Single(listing) => listing,
        };
        listing.data.children.into_iter().next().map(|child| child.data)
    }
}

/// Reddit's public JSON endpoints (no authentication).
#[derive(Debug, Clone)]
pub struct RedditClient {
    fetcher: Fetcher,
    api_base: String,
    link_base: String,
    listing_limit: u32,
}

impl RedditClient {
    pub fn new(fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            api_base: DEFAULT_API_BASE.to_string(),
            link_base: DEFAULT_LINK_BASE.to_string(),
            listing_limit: DEFAULT_LISTING_LIMIT,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_link_base(mut self, link_base: impl Into<String>) -> Self {
        self.link_base = link_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_listing_limit(mut self, limit: u32) -> Self {
        self.listing_limit = limit;
        self
    }

    /// Newest posts of `subreddit`. Listing failures propagate; per-post
    /// article lookups never do.
    pub async fn fetch_subreddit(
        &self,
        subreddit: &str,
        limit: u32,
        timeout: Duration,
    ) -> Result<Vec<NormalizedRecord>> {
        let url = format!("{}/r/{}/new.json", self.api_base, subreddit);
        let limit = limit.to_string();
        let listing: Listing = self
            .fetcher
            .get_json(&url, &[("limit", limit.as_str())], timeout)
            .await?;

        let fetched_at = Utc::now();
        let source = format!("reddit:{subreddit}");
        let posts = listing.data.children.into_iter().map(|child| child.data);

        let records: Vec<NormalizedRecord> = stream::iter(posts)
            .map(|post| self.post_record(post, &source, fetched_at))
            .buffered(ARTICLE_FETCHES_IN_FLIGHT)
            .collect()
            .await;

        info!(subreddit, count = records.len(), "fetched subreddit listing");
        Ok(records)
    }

    /// A single post by URL or bare id. Any failure is an empty result.
    pub async fn fetch_post(&self, url_or_id: &str, timeout: Duration) -> Vec<NormalizedRecord> {
        let json_url = self.post_json_url(url_or_id);

        let response: PostResponse = match self.fetcher.get_json(&json_url, &[], timeout).await {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %json_url, error = %e, "reddit post unavailable");
                return Vec::new();
            }
        };

        match response.into_first_post() {
            Some(post) => vec![self.post_record(post, POST_SOURCE, Utc::now()).await],
            None => {
                debug!(url = %json_url, "reddit post response had no post");
                Vec::new()
            }
        }
    }

    /// JSON endpoint for a post: query and fragment dropped, one trailing
    /// slash removed, `.json` appended. A bare id maps to `/comments/<id>`.
    pub fn post_json_url(&self, url_or_id: &str) -> String {
        let input = url_or_id.trim();

        let base = if input.contains("://") {
            match Url::parse(input) {
                Ok(mut parsed) => {
                    parsed.set_query(None);
                    parsed.set_fragment(None);
                    parsed.to_string()
                }
                Err(_) => input.to_string(),
            }
        } else if input.contains('/') {
            let path = input.split(['?', '#']).next().unwrap_or_default();
            format!("{}/{}", self.api_base, path.trim_start_matches('/'))
        } else {
            format!("{}/comments/{}", self.api_base, input)
        };

        if base.ends_with(".json") {
            return base;
        }
        let base = base.strip_suffix('/').unwrap_or(&base);
        format!("{base}.json")
    }

    async fn post_record(
        &self,
        post: RedditPost,
        source: &str,
        fetched_at: DateTime<Utc>,
    ) -> NormalizedRecord {
        let selftext = post.selftext.unwrap_or_default();
        let mut content = selftext.clone();

        let external_url = post.url.as_deref().filter(|_| !post.is_self.unwrap_or(false));
        if content.is_empty() {
            if let Some(url) = external_url {
                content = self.fetcher.article_text(url).await.unwrap_or_default();
            }
        }

        let link = match post.permalink.as_deref().filter(|p| !p.is_empty()) {
            Some(permalink) => Some(format!("{}{}", self.link_base, permalink)),
            None => post.url.clone(),
        };

        NormalizedRecord {
            id: post.id,
            title: post.title.unwrap_or_default(),
            link,
            published: Some(
                post.created_utc
                    .map(utils::time::from_unix_seconds)
                    .unwrap_or(fetched_at),
            ),
            summary: selftext,
            content,
            authors: ordered_authors(post.author),
            tags: post
                .link_flair_text
                .into_iter()
                .filter(|flair| !flair.trim().is_empty())
                .collect(),
            source: source.to_string(),
            fetched_at,
        }
    }
}

#[async_trait]
impl PullSource for RedditClient {
    fn source_name(&self) -> &'static str {
        "reddit"
    }

    async fn pull(&self, url: &str) -> Result<Vec<NormalizedRecord>> {
        let timeout = self.fetcher.default_timeout();
        let url = classifier::normalize_input(url);
        match classifier::reddit_target(&url) {
            Some(RedditTarget::Post(post_url)) => Ok(self.fetch_post(&post_url, timeout).await),
            Some(RedditTarget::PostId(id)) => Ok(self.fetch_post(&id, timeout).await),
            Some(RedditTarget::Subreddit(name)) => {
                self.fetch_subreddit(&name, self.listing_limit, timeout).await
            }
            None => {
                debug!(%url, "reddit url is neither a post nor a subreddit");
                Ok(Vec::new())
            }
        }
    }
}
