//! Configuration management module for parcel-notify
//!
//! Layered configuration loading with support for:
//! - TOML configuration files
//! - `PARCEL_*` environment variable overrides
//! - The provider variables shared with the web application
//!   (`EMAIL_USER`, `TWILIO_*`, `FIREBASE_SERVICE_ACCOUNT`, ...)
//! - Multiple environment configurations (development, test, staging, production)
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml`
//! 2. `{environment}.toml`
//! 3. `local.toml` (not committed to version control)
//! 4. `PARCEL_*` environment variables
//! 5. Provider environment variables

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    ApplicationConfig, DispatchConfig, EmailConfig, LoggerSettings, PushConfig, Settings,
    SmsConfig,
};
