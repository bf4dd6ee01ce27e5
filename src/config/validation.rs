//! Configuration validation logic
//!
//! Missing provider credentials are not validation errors: an unconfigured
//! provider only disables its channel at send time. Validation covers values
//! that are present but unusable.

use crate::config::error::ConfigError;
use crate::config::settings::{
    ApplicationConfig, DispatchConfig, EmailConfig, FileSettings, LoggerSettings, PushConfig,
    Settings, SmsConfig,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

impl ApplicationConfig {
    /// Validate application configuration
    ///
    /// # Validation Rules
    /// - Name must not be blank
    /// - URL must use the http or https scheme
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::invalid(
                "application.name",
                "Application name is required. It is shown in every notification.",
            ));
        }

        if !is_http_url(&self.url) {
            return Err(ConfigError::Invalid {
                field: "application.url".to_string(),
                message: format!(
                    "Invalid application URL '{}'. Expected an http:// or https:// URL.",
                    self.url
                ),
            });
        }

        Ok(())
    }
}

impl DispatchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "dispatch.channel_timeout_secs",
                "Channel timeout must be greater than 0 seconds.",
            ));
        }
        Ok(())
    }
}

impl EmailConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smtp_host.trim().is_empty() {
            return Err(ConfigError::invalid(
                "email.smtp_host",
                "SMTP host cannot be empty.",
            ));
        }

        if self.smtp_port == Some(0) {
            return Err(ConfigError::invalid(
                "email.smtp_port",
                "SMTP port must be between 1 and 65535.",
            ));
        }

        Ok(())
    }
}

impl SmsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_url(&self.api_base_url) {
            return Err(ConfigError::Invalid {
                field: "sms.api_base_url".to_string(),
                message: format!(
                    "Invalid messaging API URL '{}'. Expected an http:// or https:// URL.",
                    self.api_base_url
                ),
            });
        }
        Ok(())
    }
}

impl PushConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_url(&self.api_base_url) {
            return Err(ConfigError::Invalid {
                field: "push.api_base_url".to_string(),
                message: format!(
                    "Invalid push API URL '{}'. Expected an http:// or https:// URL.",
                    self.api_base_url
                ),
            });
        }
        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::invalid(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.application.validate()?;
        self.logger.validate()?;
        self.dispatch.validate()?;
        self.email.validate()?;
        self.sms.validate()?;
        self.push.validate()?;
        Ok(())
    }
}
