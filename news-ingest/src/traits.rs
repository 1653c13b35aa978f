use crate::types::{NormalizedRecord, Result};
use async_trait::async_trait;

/// A kind of content source the orchestrator can route a URL to.
#[async_trait]
pub trait PullSource: Send + Sync {
    /// Short name used in logs ("reddit", "twitter", "web").
    fn source_name(&self) -> &'static str;

    /// Fetch and normalize everything this source yields for `url`.
    ///
    /// An `Err` means the URL contributes nothing; the caller logs it and
    /// moves on.
    async fn pull(&self, url: &str) -> Result<Vec<NormalizedRecord>>;
}
