//! URL routing: decides which source handles an input string.

use crate::utils;
use url::Url;

const REDDIT_MARKERS: [&str; 2] = ["reddit.com", "redd.it"];
const TWITTER_MARKERS: [&str; 2] = ["twitter.com", "x.com"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Reddit,
    Twitter,
    /// Feed or plain HTML page.
    Web,
}

/// What a Reddit URL points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedditTarget {
    /// A post URL (contains `/comments/`).
    Post(String),
    /// A `redd.it/<id>` short link.
    PostId(String),
    /// A subreddit listing, lowercased name.
    Subreddit(String),
}

/// Trim the input and add `https://` to scheme-less host paths. `r/<name>`
/// shorthand is left alone.
pub fn normalize_input(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.contains("://") || is_subreddit_shorthand(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Route by substring: anything mentioning a Reddit domain (or starting with
/// `r/`) goes to Reddit, then anything mentioning a Twitter/X domain goes to
/// Twitter. Case-insensitive.
pub fn classify(url: &str) -> SourceKind {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();

    if is_subreddit_shorthand(url) || REDDIT_MARKERS.iter().any(|m| lower.contains(m)) {
        SourceKind::Reddit
    } else if TWITTER_MARKERS.iter().any(|m| lower.contains(m)) {
        SourceKind::Twitter
    } else {
        SourceKind::Web
    }
}

/// Resolve a Reddit URL to a post or a subreddit. `None` when it is neither.
pub fn reddit_target(url: &str) -> Option<RedditTarget> {
    let url = url.trim();
    if url.to_ascii_lowercase().contains("/comments/") {
        return Some(RedditTarget::Post(url.to_string()));
    }

    let is_short_link = input_host(url).is_some_and(|host| utils::url::host_matches(&host, "redd.it"));
    if is_short_link {
        if let [id] = path_segments(url).as_slice() {
            return Some(RedditTarget::PostId(id.clone()));
        }
    }

    subreddit_name(url).map(RedditTarget::Subreddit)
}

/// The `<name>` of the first `r/<name>` path segment pair, lowercased.
pub fn subreddit_name(url: &str) -> Option<String> {
    path_segments(url)
        .windows(2)
        .find(|pair| pair[0].eq_ignore_ascii_case("r"))
        .map(|pair| pair[1].to_ascii_lowercase())
}

fn is_subreddit_shorthand(input: &str) -> bool {
    input.get(..2).is_some_and(|prefix| prefix.eq_ignore_ascii_case("r/"))
}

/// Host of `url`, also for scheme-less input such as `x.com/user/status/1`.
fn input_host(url: &str) -> Option<String> {
    utils::url::host(url).or_else(|| {
        if url.contains("://") {
            None
        } else {
            utils::url::host(&format!("https://{url}"))
        }
    })
}

/// Non-empty path segments, without query or fragment. Scheme-less input is
/// split as a plain path, so the host (if any) is the first segment.
fn path_segments(url: &str) -> Vec<String> {
    match Url::parse(url) {
        Ok(parsed) if parsed.has_host() => parsed
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        _ => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    }
}
