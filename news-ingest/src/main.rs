use anyhow::Context;
use clap::Parser;
use news_ingest::cli::{self, Cli};
use news_ingest::{telemetry, IngestConfig, IngestionOrchestrator};
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing::{debug, info};

/// Exit status when no URLs were given at all.
const EXIT_NO_URLS: u8 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    telemetry::init_tracing();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = IngestConfig::from_env().context("reading NEWS_INGEST_* settings")?;
    args.apply(&mut config);

    let mut urls = args.urls();
    if urls.is_empty() {
        urls = read_stdin_urls().context("reading URLs from stdin")?;
    }
    if urls.is_empty() {
        eprintln!("No URLs provided.");
        return Ok(ExitCode::from(EXIT_NO_URLS));
    }

    let orchestrator = IngestionOrchestrator::new(&config).context("invalid configuration")?;
    info!(urls = urls.len(), hours = config.hours, "news-ingest starting");

    let count = orchestrator
        .process_url_list(&urls, &args.out)
        .await
        .with_context(|| format!("writing {}", args.out.display()))?;

    println!("Wrote {} total entries to {}", count, args.out.display());
    Ok(ExitCode::SUCCESS)
}

fn read_stdin_urls() -> io::Result<Vec<String>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprintln!("Paste feed URLs (one per line). End with an empty line:");
        cli::read_urls(stdin.lock(), true)
    } else {
        cli::read_urls(stdin.lock(), false)
    }
}
