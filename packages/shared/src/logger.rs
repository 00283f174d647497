//! Logging setup utilities for the signaling relay.

use tracing_subscriber::{filter::ParseError, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The level is applied to every target in `targets`. It can be overridden
/// entirely with the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `targets` - Log targets to enable (e.g., crate and binary names)
/// * `default_level` - The default log level (e.g., "debug", "info", "warn")
///
/// # Errors
///
/// Returns an error if `default_level` is not a valid level filter. Callers
/// are expected to treat this as fatal, since no subscriber is installed.
pub fn setup_logger(targets: &[&str], default_level: &str) -> Result<(), ParseError> {
    let directives = targets
        .iter()
        .map(|target| format!("{}={}", target.replace('-', "_"), default_level))
        .collect::<Vec<_>>()
        .join(",");

    // The default directives are validated even when RUST_LOG overrides them.
    let fallback = tracing_subscriber::EnvFilter::try_new(&directives)?;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or(fallback);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
    Ok(())
}
