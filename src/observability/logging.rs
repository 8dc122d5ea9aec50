//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Route all output to stderr
//! - Pick the level from RUST_LOG, falling back to config

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default directive when nothing else is configured.
pub const DEFAULT_DIRECTIVE: &str = "cosmos_transfer=info";

/// Build the filter: `RUST_LOG` if set and valid, else `level` for this crate.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("cosmos_transfer={}", level)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
