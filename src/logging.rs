//! Process-wide `tracing` setup.
//!
//! The library only emits events; binaries decide where they go.

use tracing_subscriber::{fmt, EnvFilter};

/// Install a `fmt` subscriber on stderr, filtered by `RUST_LOG` (default: `info`).
///
/// ```no_run
/// scorecard_intake::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Verbose subscriber routed through the test harness. Safe to call more than once.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
