use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize logging on stderr, keeping stdout for the roadbook.
///
/// RUST_LOG takes precedence; otherwise `info`, or `debug` for the library when verbose.
pub fn setup_logging(verbose: bool) {
    let default_filter = if verbose {
        "info,roadbook_lib=debug,roadbook=debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_filter(filter);

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        tracing::warn!("A global tracing subscriber was already installed");
    }
}
