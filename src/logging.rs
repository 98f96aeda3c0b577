//! Structured logging setup
//!
//! `RUST_LOG` takes precedence over the configured directive.

use tracing_subscriber::EnvFilter;

/// Resolve the filter: `RUST_LOG` if set and valid, else `directive`
pub fn filter(directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// Returns false if a subscriber was already installed.
pub fn init(directive: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter(directive))
        .with_target(true)
        .try_init()
        .is_ok()
}
