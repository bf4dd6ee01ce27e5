//! Configuration loader for parcel-notify
//!
//! This module provides the `ConfigLoader` struct that handles loading
//! configuration from multiple sources with proper precedence.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
const CONFIG_DIR_ENV: &str = "PARCEL_CONFIG_DIR";

/// Environment variable for a single configuration file
const CONFIG_FILE_ENV: &str = "PARCEL_CONFIG_FILE";

const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "PARCEL";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Provider variables shared with the web application, mapped onto settings keys
const PROVIDER_ENV_VARS: &[(&str, &str)] = &[
    ("EMAIL_USER", "email.user"),
    ("EMAIL_PASS", "email.password"),
    ("NEXT_PUBLIC_APP_NAME", "application.name"),
    ("NEXT_PUBLIC_APP_URL", "application.url"),
    ("TWILIO_ACCOUNT_SID", "sms.account_sid"),
    ("TWILIO_AUTH_TOKEN", "sms.auth_token"),
    ("TWILIO_PHONE_NUMBER", "sms.phone_number"),
    ("FIREBASE_SERVICE_ACCOUNT", "push.service_account"),
];

/// SMS feature flag; only the exact value `true` enables SMS
const SMS_ENABLED_ENV: &str = "TWILIO_ENABLED";

type Builder = ConfigBuilder<DefaultState>;

/// Configuration loader that handles layered configuration loading
///
/// Sources in order of priority (lowest first):
/// 1. `default.toml`
/// 2. `{environment}.toml`
/// 3. `local.toml`
/// 4. `PARCEL_*` environment variables
/// 5. Provider variables (`EMAIL_USER`, `TWILIO_*`, `FIREBASE_SERVICE_ACCOUNT`, ...)
///
/// Layer files are optional so the notifier can run from the environment
/// alone. An explicitly selected configuration file must exist.
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    /// Specific configuration file path (if set, skips layered loading)
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a new configuration loader
    ///
    /// Reads `PARCEL_CONFIG_DIR`, `PARCEL_CONFIG_FILE` and `PARCEL_APP_ENV`.
    ///
    /// # Errors
    ///
    /// Returns an error if both `PARCEL_CONFIG_DIR` and `PARCEL_CONFIG_FILE`
    /// are set, as they are mutually exclusive.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));

        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_file.is_some() && std::env::var(CONFIG_DIR_ENV).is_ok() {
            return Err(ConfigError::ConflictingSources);
        }

        Ok(Self {
            config_dir,
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Use a single configuration file instead of the layered directory
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Override the environment read from `PARCEL_APP_ENV`
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Load and validate settings from all sources
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::Deserialize(e.to_string())
        })?;

        settings.validate()?;

        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = if let Some(ref config_file) = self.config_file {
            Self::add_file_source(builder, config_file, true)?
        } else {
            self.build_layered_config(builder)?
        };

        let builder = Self::add_env_source(builder);
        let builder = Self::add_provider_overrides(builder)?;

        builder.build().map_err(ConfigError::from)
    }

    fn build_layered_config(&self, builder: Builder) -> Result<Builder, ConfigError> {
        let default_path = self.config_dir.join("default.toml");
        let builder = Self::add_file_source(builder, &default_path, false)?;

        let env_path = self
            .config_dir
            .join(format!("{}.toml", self.environment.as_str()));
        let builder = Self::add_file_source(builder, &env_path, false)?;

        let local_path = self.config_dir.join("local.toml");
        Self::add_file_source(builder, &local_path, false)
    }

    fn add_file_source(
        builder: Builder,
        path: &Path,
        required: bool,
    ) -> Result<Builder, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        Ok(builder.add_source(
            File::new(path.to_str().unwrap_or_default(), FileFormat::Toml).required(required),
        ))
    }

    /// `PARCEL_SMS__ENABLED` -> `sms.enabled`, `PARCEL_EMAIL__USER` -> `email.user`
    ///
    /// Values stay strings so phone numbers keep their leading `+`; serde
    /// converts booleans and numbers during deserialization.
    fn add_env_source(builder: Builder) -> Builder {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true),
        )
    }

    fn add_provider_overrides(builder: Builder) -> Result<Builder, ConfigError> {
        let mut builder = builder;
        for (var, key) in PROVIDER_ENV_VARS {
            let value = std::env::var(var).ok().filter(|v| !v.is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        let sms_enabled = std::env::var(SMS_ENABLED_ENV).ok().map(|v| v == "true");
        Ok(builder.set_override_option("sms.enabled", sms_enabled)?)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: None,
            environment: AppEnvironment::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Tests mutate process environment variables
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
        }
        temp_dir
    }

    /// Restores every touched environment variable on drop
    struct EnvGuard {
        vars_to_restore: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        /// Starts from an environment without any notifier variables
        fn clean() -> Self {
            let mut guard = Self {
                vars_to_restore: Vec::new(),
            };
            for var in [
                CONFIG_DIR_ENV,
                CONFIG_FILE_ENV,
                AppEnvironment::ENV_VAR,
                SMS_ENABLED_ENV,
                "PARCEL_SMS__ENABLED",
                "PARCEL_DISPATCH__CHANNEL_TIMEOUT_SECS",
                "PARCEL_SMS__PHONE_NUMBER",
            ] {
                guard.remove(var);
            }
            for (var, _) in PROVIDER_ENV_VARS {
                guard.remove(var);
            }
            guard
        }

        fn set(&mut self, key: &str, value: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        fn remove(&mut self, key: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, original_value) in self.vars_to_restore.iter().rev() {
                unsafe {
                    match original_value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    const DEFAULT_TOML: &str = r#"
[application]
name = "ShipHub"
url = "https://portal.shiphub.test"

[dispatch]
channel_timeout_secs = 5

[sms]
account_sid = "AC-file"
auth_token = "file-token"
phone_number = "+15550000000"
"#;

    #[test]
    fn test_config_loader_new_default() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.config_dir, PathBuf::from("config"));
        assert!(loader.config_file.is_none());
        assert_eq!(loader.environment(), AppEnvironment::Development);
    }

    #[test]
    fn test_config_dir_and_file_conflict() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();

        env.set(CONFIG_DIR_ENV, "/custom/config");
        env.set(CONFIG_FILE_ENV, "/path/to/config.toml");

        match ConfigLoader::new() {
            Err(err @ ConfigError::ConflictingSources) => {
                assert!(err.to_string().contains("PARCEL_CONFIG_DIR"));
                assert!(err.to_string().contains("PARCEL_CONFIG_FILE"));
            }
            other => panic!("Expected ConflictingSources, got {other:?}"),
        }
    }

    #[test]
    fn test_load_without_any_files_uses_defaults() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());

        let settings = ConfigLoader::new().unwrap().load().expect("Should load");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let result = ConfigLoader::new()
            .unwrap()
            .with_file("/definitely/not/here.toml")
            .load();
        assert!(matches!(result, Err(ConfigError::FileNotFound(path)) if path.ends_with("here.toml")));
    }

    #[test]
    fn test_layered_precedence() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();

        let production = r#"
[dispatch]
channel_timeout_secs = 8
"#;
        let local = r#"
[application]
name = "ShipHub Local"
"#;
        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_TOML),
            ("production.toml", production),
            ("local.toml", local),
        ]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set(AppEnvironment::ENV_VAR, "production");
        env.set("PARCEL_DISPATCH__CHANNEL_TIMEOUT_SECS", "2");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load");

        // prefixed variable beats production.toml
        assert_eq!(settings.dispatch.channel_timeout_secs, 2);
        // local.toml beats default.toml
        assert_eq!(settings.application.name, "ShipHub Local");
        assert_eq!(settings.application.url, "https://portal.shiphub.test");
    }

    #[test]
    fn test_provider_variables_override_files() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_TOML)]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());

        env.set("EMAIL_USER", "noreply@shiphub.test");
        env.set("EMAIL_PASS", "app-password");
        env.set("NEXT_PUBLIC_APP_NAME", "ShipHub Portal");
        env.set("NEXT_PUBLIC_APP_URL", "https://app.shiphub.test");
        env.set("TWILIO_ACCOUNT_SID", "AC-env");
        env.set("TWILIO_PHONE_NUMBER", "+15551234567");
        env.set("FIREBASE_SERVICE_ACCOUNT", r#"{"project_id":"shiphub"}"#);

        let settings = ConfigLoader::new().unwrap().load().expect("Should load");

        assert!(settings.email.is_configured());
        assert_eq!(settings.email.user, "noreply@shiphub.test");
        assert_eq!(settings.application.name, "ShipHub Portal");
        assert_eq!(settings.application.url, "https://app.shiphub.test");
        assert_eq!(settings.sms.account_sid, "AC-env");
        assert_eq!(settings.sms.auth_token, "file-token");
        assert_eq!(settings.sms.phone_number, "+15551234567");
        assert!(settings.push.is_configured());
    }

    #[test]
    fn test_sms_flag_only_enabled_by_exact_true() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());

        let load = || ConfigLoader::new().unwrap().load().unwrap().sms.enabled;

        assert!(!load());

        env.set(SMS_ENABLED_ENV, "true");
        assert!(load());

        env.set(SMS_ENABLED_ENV, "TRUE");
        assert!(!load());

        env.set(SMS_ENABLED_ENV, "1");
        assert!(!load());
    }

    #[test]
    fn test_sms_flag_overrides_prefixed_variable() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());

        env.set("PARCEL_SMS__ENABLED", "true");
        assert!(ConfigLoader::new().unwrap().load().unwrap().sms.enabled);

        env.set(SMS_ENABLED_ENV, "false");
        assert!(!ConfigLoader::new().unwrap().load().unwrap().sms.enabled);
    }

    #[test]
    fn test_prefixed_phone_number_keeps_plus_sign() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set("PARCEL_SMS__PHONE_NUMBER", "+15557654321");

        let settings = ConfigLoader::new().unwrap().load().unwrap();
        assert_eq!(settings.sms.phone_number, "+15557654321");
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set("NEXT_PUBLIC_APP_URL", "portal.shiphub.test");

        let result = ConfigLoader::new().unwrap().load();
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { field, .. }) if field == "application.url"
        ));
    }
}
