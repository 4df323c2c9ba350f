use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global tracing subscriber
///
/// Logs go to stderr so command output on stdout stays clean. `RUST_LOG`
/// wins when set; otherwise `verbose` selects `debug` for this crate and
/// `warn` everywhere else.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "warn,discord_purge=debug" } else { "warn" };
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).without_time())
        .with(filter_layer)
        .try_init();
}
