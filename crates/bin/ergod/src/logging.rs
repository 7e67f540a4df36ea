//! Global `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use crate::config::{LogFormat, LoggingConfig};

/// Failure to install the log subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter {filter:?}")]
    Filter {
        filter: String,
        #[source]
        source: ParseError,
    },
    #[error("failed to install the global subscriber")]
    Install(#[from] TryInitError),
}

/// Build the filter for `config`.
///
/// # Errors
///
/// Returns [`LoggingError::Filter`] when the directive does not parse.
pub fn filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(&config.filter).map_err(|source| LoggingError::Filter {
        filter: config.filter.clone(),
        source,
    })
}

/// Install the process-wide subscriber. Call once, before anything logs.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already set.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let registry = tracing_subscriber::registry().with(filter(config)?);

    match config.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?,
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer())
            .try_init()?,
    }

    tracing::debug!(filter = %config.filter, format = ?config.format, "logging initialised");
    Ok(())
}
