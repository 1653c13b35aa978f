use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber: `RUST_LOG` filter (default `info`), events on
/// stderr so stdout stays free for command output. Later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
