use crate::config::ConfigError;
use crate::notifications::Channel;
use thiserror::Error;

/// Notifier-wide error type.
///
/// Channel senders produce these internally and convert them into a
/// `SendResult` at their public boundary, so none of these variants ever
/// reach a caller of the dispatcher.
#[derive(Error, Debug)]
pub enum AppError {
    /// Provider credentials are missing for a channel
    #[error("{channel} service not configured")]
    NotConfigured { channel: Channel },

    /// The provider or its transport rejected the request
    #[error("{message}")]
    Provider { channel: Channel, message: String },

    /// A channel attempt exceeded the dispatch timeout
    #[error("{channel} delivery timed out after {millis}ms")]
    Timeout { channel: Channel, millis: u128 },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn provider(channel: Channel, message: impl Into<String>) -> Self {
        AppError::Provider {
            channel,
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = error.field().unwrap_or("settings").to_string();
        AppError::Configuration {
            key,
            source: error.into(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
