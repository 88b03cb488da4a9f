//! Logging setup for the command line tool.
//!
//! Logs go to stderr so command output on stdout stays clean. Set
//! `SX_DEBUG=1` for debug output from this crate; `RUST_LOG` overrides both.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Directive used when `RUST_LOG` is not set.
pub fn filter_directive(debug_logging: bool) -> &'static str {
    if debug_logging {
        // debug for this crate, info for dependencies
        "info,sx_overlay=debug"
    } else {
        "info"
    }
}

/// Install the global subscriber. Call once, early in `main`.
pub fn init() {
    let debug_logging = std::env::var("SX_DEBUG").is_ok_and(|v| v == "1");

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(debug_logging)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .init();

    tracing::debug!(debug_logging, "logging initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_directive_targets_this_crate() {
        assert_eq!(filter_directive(false), "info");
        assert!(filter_directive(true).contains("sx_overlay=debug"));
        assert!(EnvFilter::try_new(filter_directive(true)).is_ok());
    }
}
