pub mod classifier;
pub mod cli;
pub mod config;
pub mod extract;
pub mod fetcher;
pub mod normalizer;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod resolver;
pub mod sources;
pub mod telemetry;
pub mod traits;
pub mod types;
pub mod utils;

pub use classifier::{classify, RedditTarget, SourceKind};
pub use config::{DefaultSources, IngestConfig, RedditConfig};
pub use extract::ArticleContent;
pub use fetcher::Fetcher;
pub use normalizer::EntryNormalizer;
pub use orchestrator::IngestionOrchestrator;
pub use parser::FeedParser;
pub use resolver::FeedResolver;
pub use sources::{RedditClient, TwitterOEmbedClient, WebSource};
pub use traits::PullSource;
pub use types::*;
