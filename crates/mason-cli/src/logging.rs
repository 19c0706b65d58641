//! Process-wide log subscriber
use tracing_subscriber::EnvFilter;

/// Variable holding the log filter, in `EnvFilter` syntax
pub const LOG_ENV: &str = "MASON_LOG";

/// Install the subscriber. Logs go to stderr so JSON on stdout stays clean.
///
/// `verbose` raises the default level to debug when `MASON_LOG` is unset.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}
