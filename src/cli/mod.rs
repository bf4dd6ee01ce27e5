//! CLI module for parcel-notify
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing with clap
//! - Configuration loading with CLI overrides
//! - Command handlers for check, render and send

pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

// Re-export public types for convenience
pub use executor::execute_command;
pub use parser::{ChannelArg, Cli, Commands, Environment};

use crate::config::{ConfigError, ConfigLoader, Settings};
use crate::logger::init_logger;

/// Load settings, honouring `--config` and `--env`
///
/// # Errors
/// Returns error if configuration loading or validation fails
pub fn load_config(cli: &Cli) -> Result<Settings, ConfigError> {
    let mut loader = ConfigLoader::new()?;
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    if let Some(env) = cli.env {
        loader = loader.with_environment(env.into());
    }
    loader.load()
}

/// Initialize logger from settings, applying `--verbose` / `--quiet`
///
/// # Errors
/// Returns error if the logger configuration is invalid or the subscriber
/// cannot be installed
pub fn init_logger_from_settings(settings: &Settings, cli: &Cli) -> anyhow::Result<()> {
    let mut logger_settings = settings.logger.clone();
    if let Some(level) = cli.log_level_override() {
        logger_settings.level = level.to_string();
    }

    let logger_config = logger_settings.into_logger_config()?;
    init_logger(logger_config)
}
