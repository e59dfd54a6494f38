//! Tracing subscriber setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set. Otherwise library logs are shown at `debug`
/// with `--verbose` and only warnings without it, so they stay out of the
/// way of regular command output.
pub fn init_logger(verbose: bool, colored: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let fmt_layer = fmt::layer()
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .compact()
        .with_ansi(colored);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
