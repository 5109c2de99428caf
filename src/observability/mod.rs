//! Diagnostic logging.
//!
//! Diagnostics go to stderr through `tracing`; reports and summaries are
//! printed on stdout so they can be redirected cleanly. `RUST_LOG` takes
//! precedence over the `-v` count. Records emitted through the `log` facade
//! are forwarded to the same subscriber.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    format!("warn,connref={level}")
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(verbosity: u8, ansi: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(verbosity > 1)
        .without_time()
        .with_filter(filter);

    let _ = tracing_subscriber::registry().with(layer).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_by_verbosity() {
        assert_eq!(default_directive(0), "warn,connref=info");
        assert_eq!(default_directive(1), "warn,connref=debug");
        assert_eq!(default_directive(5), "warn,connref=trace");
    }

    #[test]
    fn test_init_is_idempotent() {
        init_logging(0, false);
        init_logging(2, false);
    }
}
