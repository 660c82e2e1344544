//! Tracing subscriber setup.
//!
//! Directives come from `MULTIPLIED_LOG` when set, otherwise from the
//! verbosity flag count: `warn`, then `debug`, then `trace`.

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "MULTIPLIED_LOG";

/// Errors surfaced when installing the subscriber fails.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The directive string could not be parsed.
    #[error("invalid tracing directive: {0}")]
    InvalidFilter(String),
    /// A global subscriber is already installed.
    #[error("failed to install global tracing subscriber: {0}")]
    SubscriberInit(#[from] TryInitError),
}

/// Default directive for a `-v` count.
#[must_use]
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Resolve the filter: `MULTIPLIED_LOG` when set, else the verbosity
/// default.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidFilter`] if `MULTIPLIED_LOG` is set but
/// malformed.
pub fn resolve_filter(verbosity: u8) -> Result<EnvFilter, LoggingError> {
    filter_from(std::env::var(LOG_ENV).ok().as_deref(), verbosity)
}

/// Build the filter from explicit directives, falling back to the
/// verbosity default when they are absent or blank.
fn filter_from(directives: Option<&str>, verbosity: u8) -> Result<EnvFilter, LoggingError> {
    match directives {
        Some(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives)
            .map_err(|err| LoggingError::InvalidFilter(err.to_string())),
        _ => Ok(EnvFilter::new(default_directive(verbosity))),
    }
}

/// Install a stderr formatter filtered by [`resolve_filter`].
///
/// # Errors
///
/// Returns [`LoggingError`] for a bad filter or when a subscriber is
/// already installed.
pub fn init(verbosity: u8) -> Result<(), LoggingError> {
    let filter = resolve_filter(verbosity)?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()?;
    Ok(())
}
