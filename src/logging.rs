//! Logging setup for the provider.
//!
//! Logs go to **stderr**; the host that drives the provider owns stdout.
//! Filtering follows the `RUST_LOG` environment variable, e.g.
//!
//! ```bash
//! RUST_LOG=quicknode_provider=debug terraform apply
//! ```
//!
//! HTTP calls are logged at `debug` with method and path. The API key is
//! never part of any event.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the default logging subscriber at `info` level.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging() {
    init_logging_with_default("info");
}

/// Initialize logging, using `default_level` when `RUST_LOG` is not set.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
///
/// # Example
///
/// ```ignore
/// quicknode_provider::init_logging_with_default("debug");
/// ```
pub fn init_logging_with_default(default_level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(stderr_layer())
        .init();
}

/// Try to initialize logging, returning false if a subscriber was already set.
///
/// Useful in tests where several cases race to install the subscriber.
pub fn try_init_logging() -> bool {
    tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(stderr_layer())
        .try_init()
        .is_ok()
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_parsing() {
        assert!(EnvFilter::try_new("info").is_ok());
        assert!(EnvFilter::try_new("quicknode_provider=debug").is_ok());
        assert!(EnvFilter::try_new("warn,quicknode_provider::client=trace").is_ok());
    }

    #[test]
    fn test_try_init_is_idempotent() {
        // Only the first call can install the global subscriber.
        let first = try_init_logging();
        assert!(!try_init_logging());
        let _ = first;
    }
}
