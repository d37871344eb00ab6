//! Logging setup
//!
//! Diagnostics go to stderr through `tracing`; the launcher report itself is
//! written to stdout by the orchestrator.

use tracing_subscriber::EnvFilter;

/// Map `-v` occurrences to a default level
pub fn level_for_verbosity(verbose: u8) -> tracing::Level {
    match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

/// Initialize stderr logging; `RUST_LOG` overrides the verbosity default
pub fn init_logging(verbose: u8) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level_for_verbosity(verbose).into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
