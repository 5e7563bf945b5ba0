//! Logging initialization for embedding shells.
//!
//! The lifecycle crates only emit `tracing` events; an embedding shell
//! calls this once at startup to get them onto stderr.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber.
///
/// The log level comes from `RUST_LOG` when set, otherwise the provided
/// default. A second call is a no-op.
///
/// # Example
///
/// ```ignore
/// init_logging("info");
/// tracing::info!("Console shell started");
/// ```
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
