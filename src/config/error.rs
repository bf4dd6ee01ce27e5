//! Errors raised while loading or validating settings

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested file does not exist
    #[error("Configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The merged sources do not fit the `Settings` shape
    #[error("Failed to deserialize settings: {0}")]
    Deserialize(String),

    /// A setting has an unusable value
    #[error("Invalid setting `{field}`: {message}")]
    Invalid { field: String, message: String },

    #[error("Unknown environment '{0}'. Valid values are: development, test, staging, production")]
    UnknownEnvironment(String),

    /// `PARCEL_CONFIG_DIR` and `PARCEL_CONFIG_FILE` were both set
    #[error(
        "PARCEL_CONFIG_DIR and PARCEL_CONFIG_FILE cannot both be set. Use PARCEL_CONFIG_DIR for layered configuration or PARCEL_CONFIG_FILE for a single file"
    )]
    ConflictingSources,

    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Dotted path of the offending setting, when there is one
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::Invalid { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_names_field() {
        let err = ConfigError::invalid("dispatch.channel_timeout_secs", "must be greater than 0");
        assert_eq!(err.field(), Some("dispatch.channel_timeout_secs"));
        assert_eq!(
            err.to_string(),
            "Invalid setting `dispatch.channel_timeout_secs`: must be greater than 0"
        );
    }

    #[test]
    fn test_file_not_found_shows_path() {
        let err = ConfigError::FileNotFound(PathBuf::from("/etc/parcel/missing.toml"));
        assert!(err.to_string().ends_with("/etc/parcel/missing.toml"));
        assert_eq!(err.field(), None);
    }
}
