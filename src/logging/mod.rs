//! Structured logging initialization for the `eion-server` binary.
//!
//! `corbusier` itself carries no subscriber setup (it only emits
//! `tracing` events), so this follows the ecosystem's standard
//! `tracing-subscriber` registry layering, selecting JSON or human-readable
//! output per `logger.format` (`spec.md` §6).

use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LogLevel, LoggerSettings};

/// Error initializing the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// A global subscriber was already installed.
    #[error("logging already initialized: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// Installs the global `tracing` subscriber per `settings`.
///
/// # Errors
///
/// Returns [`LoggingError::AlreadyInitialized`] if a global subscriber is
/// already installed (e.g. in tests that call this more than once).
pub fn init(settings: &LoggerSettings) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_new(level_filter(settings.level)).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match settings.format {
        LogFormat::Json => registry.with(fmt::layer().json().with_current_span(true)).try_init()?,
        LogFormat::Dev => registry.with(fmt::layer().pretty()).try_init()?,
    }
    Ok(())
}

const fn level_filter(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_filter_maps_every_level() {
        assert_eq!(level_filter(LogLevel::Debug), "debug");
        assert_eq!(level_filter(LogLevel::Info), "info");
        assert_eq!(level_filter(LogLevel::Warn), "warn");
        assert_eq!(level_filter(LogLevel::Error), "error");
    }
}
