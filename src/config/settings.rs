//! Configuration settings structures for parcel-notify
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "ParcelForward".to_string()
}

fn default_app_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/parcel-notify.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_channel_timeout() -> u64 {
    10
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_twilio_api_url() -> String {
    "https://api.twilio.com".to_string()
}

fn default_fcm_api_url() -> String {
    "https://fcm.googleapis.com".to_string()
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Branding used by the message templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Display name shown in subjects, SMS prefixes and push titles
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Public base URL used to build deep links in emails
    #[serde(default = "default_app_url")]
    pub url: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            url: default_app_url(),
        }
    }
}

// ============================================================================
// Dispatch Configuration
// ============================================================================

/// Fan-out behaviour of the dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Upper bound for a single channel attempt, in seconds
    #[serde(default = "default_channel_timeout")]
    pub channel_timeout_secs: u64,
}

impl DispatchConfig {
    pub fn channel_timeout(&self) -> Duration {
        Duration::from_secs(self.channel_timeout_secs)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            channel_timeout_secs: default_channel_timeout(),
        }
    }
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// SMTP relay account used by the email channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailConfig {
    /// SMTP account, also used as the sender address
    #[serde(default)]
    pub user: String,

    /// SMTP password (an app password for Gmail-style relays)
    #[serde(default)]
    pub password: String,

    /// SMTP relay host, implicit TLS
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    /// Overrides the relay's default port (465)
    #[serde(default)]
    pub smtp_port: Option<u16>,

    /// Sender display name, falls back to the application name
    #[serde(default)]
    pub from_name: Option<String>,
}

impl EmailConfig {
    /// Whether both SMTP credentials are present
    pub fn is_configured(&self) -> bool {
        !self.user.trim().is_empty() && !self.password.is_empty()
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            user: String::new(),
            password: String::new(),
            smtp_host: default_smtp_host(),
            smtp_port: None,
            from_name: None,
        }
    }
}

/// Twilio Programmable Messaging account used by the SMS channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsConfig {
    /// SMS is opt-in: the dispatcher skips phone numbers unless this is set
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub account_sid: String,

    #[serde(default)]
    pub auth_token: String,

    /// Sender number in E.164 format
    #[serde(default)]
    pub phone_number: String,

    /// Base URL of the messaging API
    #[serde(default = "default_twilio_api_url")]
    pub api_base_url: String,
}

impl SmsConfig {
    /// Whether the account credentials and sender number are present
    pub fn is_configured(&self) -> bool {
        !self.account_sid.trim().is_empty()
            && !self.auth_token.is_empty()
            && !self.phone_number.trim().is_empty()
    }
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            account_sid: String::new(),
            auth_token: String::new(),
            phone_number: String::new(),
            api_base_url: default_twilio_api_url(),
        }
    }
}

/// Firebase Cloud Messaging access used by the push channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushConfig {
    /// Service-account credential as a JSON document
    #[serde(default)]
    pub service_account: String,

    /// Base URL of the FCM HTTP v1 API
    #[serde(default = "default_fcm_api_url")]
    pub api_base_url: String,
}

impl PushConfig {
    pub fn is_configured(&self) -> bool {
        !self.service_account.trim().is_empty()
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            service_account: String::new(),
            api_base_url: default_fcm_api_url(),
        }
    }
}

// ============================================================================
// Logger Settings (compatible with LoggerConfig)
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    /// Whether to append to an existing file instead of truncating it
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert the file representation into the runtime LoggerConfig
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console_config = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file_config = self.file.into_file_config()?;

        LoggerConfig::new(console_config, file_config, self.level).map_err(|e| {
            ConfigError::Invalid {
                field: "logger".to_string(),
                message: e.to_string(),
            }
        })
    }
}

impl FileSettings {
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::Invalid {
                field: "logger.file.format".to_string(),
                message: e.to_string(),
            })?;

        FileConfig::new(self.enabled, PathBuf::from(self.path), self.append, format).map_err(
            |e| ConfigError::Invalid {
                field: "logger.file".to_string(),
                message: e.to_string(),
            },
        )
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete notifier settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub logger: LoggerSettings,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub email: EmailConfig,

    #[serde(default)]
    pub sms: SmsConfig,

    #[serde(default)]
    pub push: PushConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.application.name, "ParcelForward");
        assert_eq!(settings.application.url, "http://localhost:3000");
        assert_eq!(settings.dispatch.channel_timeout(), Duration::from_secs(10));
        assert_eq!(settings.email.smtp_host, "smtp.gmail.com");
        assert!(!settings.sms.enabled);
        assert_eq!(settings.sms.api_base_url, "https://api.twilio.com");
        assert_eq!(settings.push.api_base_url, "https://fcm.googleapis.com");
    }

    #[test]
    fn test_providers_unconfigured_by_default() {
        let settings = Settings::default();
        assert!(!settings.email.is_configured());
        assert!(!settings.sms.is_configured());
        assert!(!settings.push.is_configured());
    }

    #[test]
    fn test_email_needs_user_and_password() {
        let mut email = EmailConfig {
            user: "ops@example.com".to_string(),
            ..Default::default()
        };
        assert!(!email.is_configured());

        email.password = "app-password".to_string();
        assert!(email.is_configured());

        email.user = "   ".to_string();
        assert!(!email.is_configured());
    }

    #[test]
    fn test_sms_needs_all_three_values() {
        let mut sms = SmsConfig {
            account_sid: "AC123".to_string(),
            auth_token: "secret".to_string(),
            ..Default::default()
        };
        assert!(!sms.is_configured());

        sms.phone_number = "+15550001111".to_string();
        assert!(sms.is_configured());
        // credentials alone do not enable SMS
        assert!(!sms.enabled);
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let toml_str = r#"
            [application]
            name = "ShipHub"

            [sms]
            enabled = true
        "#;

        let settings: Settings = toml::from_str(toml_str).expect("Failed to deserialize");
        assert_eq!(settings.application.name, "ShipHub");
        assert_eq!(settings.application.url, "http://localhost:3000");
        assert!(settings.sms.enabled);
        assert_eq!(settings.sms.api_base_url, "https://api.twilio.com");
        assert_eq!(settings.logger, LoggerSettings::default());
    }

    #[test]
    fn test_settings_deserialize_full() {
        let toml_str = r#"
            [application]
            name = "ShipHub"
            url = "https://portal.shiphub.test"

            [logger]
            level = "debug"

            [logger.console]
            enabled = true
            colored = false

            [logger.file]
            enabled = true
            path = "logs/test.log"
            append = false
            format = "compact"

            [dispatch]
            channel_timeout_secs = 3

            [email]
            user = "noreply@shiphub.test"
            password = "pw"
            smtp_host = "smtp.shiphub.test"
            smtp_port = 2465
            from_name = "ShipHub Notifications"

            [sms]
            enabled = true
            account_sid = "AC1"
            auth_token = "tok"
            phone_number = "+15550001111"
            api_base_url = "http://localhost:9000"

            [push]
            service_account = "{}"
            api_base_url = "http://localhost:9001"
        "#;

        let settings: Settings = toml::from_str(toml_str).expect("Failed to deserialize");

        assert_eq!(settings.application.url, "https://portal.shiphub.test");
        assert_eq!(settings.logger.level, "debug");
        assert!(!settings.logger.console.colored);
        assert!(settings.logger.file.enabled);
        assert_eq!(settings.logger.file.format, "compact");
        assert_eq!(settings.dispatch.channel_timeout_secs, 3);
        assert_eq!(settings.email.smtp_port, Some(2465));
        assert_eq!(
            settings.email.from_name.as_deref(),
            Some("ShipHub Notifications")
        );
        assert!(settings.email.is_configured());
        assert!(settings.sms.is_configured());
        assert_eq!(settings.sms.api_base_url, "http://localhost:9000");
        assert!(settings.push.is_configured());
    }

    #[test]
    fn test_logger_settings_into_logger_config() {
        let settings = LoggerSettings {
            level: "debug".to_string(),
            console: ConsoleSettings {
                enabled: true,
                colored: false,
            },
            file: FileSettings {
                enabled: true,
                path: "logs/notify.log".to_string(),
                append: false,
                format: "full".to_string(),
            },
        };

        let config = settings.into_logger_config().expect("Should convert");
        assert_eq!(config.level, "debug");
        assert!(!config.console.colored);
        assert!(config.file.enabled);
        assert_eq!(config.file.path, PathBuf::from("logs/notify.log"));
        assert_eq!(config.file.format, LogFormat::Full);
    }

    #[test]
    fn test_logger_settings_invalid_format() {
        let settings = LoggerSettings {
            file: FileSettings {
                format: "xml".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let err = settings.into_logger_config().unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field, .. } if field == "logger.file.format")
        );
    }

    #[test]
    fn test_logger_settings_both_outputs_disabled() {
        let settings = LoggerSettings {
            console: ConsoleSettings {
                enabled: false,
                colored: false,
            },
            ..Default::default()
        };

        let err = settings.into_logger_config().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field, .. } if field == "logger"));
    }
}
