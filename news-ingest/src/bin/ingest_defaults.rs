use anyhow::Context;
use clap::Parser;
use news_ingest::cli::DefaultsCli;
use news_ingest::{telemetry, IngestConfig, IngestionOrchestrator};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let args = DefaultsCli::parse();
    let mut config = IngestConfig::from_env().context("reading NEWS_INGEST_* settings")?;
    args.fetch.apply(&mut config);

    let orchestrator = IngestionOrchestrator::new(&config).context("invalid configuration")?;
    info!(
        web_feeds = config.defaults.web_feeds.len(),
        reddit_communities = config.defaults.reddit_communities.len(),
        "running default sources"
    );

    let count = orchestrator
        .run_defaults(&config.defaults, &args.out)
        .await
        .with_context(|| format!("writing {}", args.out.display()))?;

    println!("Wrote {} total entries to {}", count, args.out.display());
    Ok(())
}
