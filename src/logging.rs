//! Diagnostic tracing for Goalmet.
//!
//! Storage and decode failures are never shown to the user as errors, so the
//! log is the only place they surface. Output goes to stderr so it never
//! mixes with command output on stdout.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG` first and falls back to the configured level.
///
/// # Example
/// ```bash
/// RUST_LOG=goalmet=debug goalmet list
/// ```
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
