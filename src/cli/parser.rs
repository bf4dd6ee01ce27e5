//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::Environment as AppEnvironment;
use crate::notifications::{Channel, EventData, EventType};

/// Outbound notification dispatcher for ParcelForward
#[derive(Parser, Debug)]
#[command(name = "parcel-notify")]
#[command(about = "Render and send ParcelForward customer notifications")]
#[command(long_about = "
parcel-notify renders the email, SMS and push templates for shipment and
billing events and dispatches them through the configured providers.

EXAMPLES:
    # Show which providers are configured
    parcel-notify check

    # Preview the SMS sent when an invoice goes out
    parcel-notify render --event invoice_sent --channel sms \\
        --data '{\"invoiceNumber\":\"INV-42\",\"amount\":120.5}'

    # Send a delivery confirmation, reading event data from a file
    parcel-notify send --event delivery_confirmation \\
        --email customer@example.com --data @delivery.json

    # Use a custom configuration file
    parcel-notify --config /etc/parcel-notify/production.toml check
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// Load settings from this TOML file instead of the layered `config/`
    /// directory. Environment variables still override it.
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects the `{environment}.toml` layer.
    /// Available values: development (dev), test, staging, production (prod)
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration and report which channels are configured
    ///
    /// Examples:
    ///   parcel-notify check
    ///   parcel-notify --env production check
    Check,

    /// Render one event for one channel and print it as JSON
    ///
    /// Nothing is sent. Useful for reviewing template changes.
    Render {
        /// Event type, e.g. order_confirmation
        #[arg(long, value_name = "EVENT", value_parser = super::validation::parse_event_type)]
        event: EventType,

        /// Channel to render
        #[arg(long, value_enum)]
        channel: ChannelArg,

        /// Event data as JSON, or @path to read it from a file
        #[arg(long, value_name = "JSON|@FILE", value_parser = super::validation::parse_event_data)]
        data: Option<EventData>,
    },

    /// Dispatch one event to every destination given
    ///
    /// Examples:
    ///   parcel-notify send --event payment_received --email a@b.com \
    ///       --data '{"amount":49.99,"transactionId":"TXN-1"}'
    Send {
        /// Event type, e.g. payment_received
        #[arg(long, value_name = "EVENT", value_parser = super::validation::parse_event_type)]
        event: EventType,

        /// Recipient user id, used for log correlation only
        #[arg(long, default_value = "cli")]
        user_id: String,

        /// Recipient email address
        #[arg(long)]
        email: Option<String>,

        /// Recipient phone number in E.164 format (sent only when SMS is enabled)
        #[arg(long)]
        phone: Option<String>,

        /// Recipient device registration token
        #[arg(long)]
        push_token: Option<String>,

        /// Event data as JSON, or @path to read it from a file
        #[arg(long, value_name = "JSON|@FILE", value_parser = super::validation::parse_event_data)]
        data: Option<EventData>,
    },
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

impl From<Environment> for AppEnvironment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => AppEnvironment::Development,
            Environment::Test => AppEnvironment::Test,
            Environment::Staging => AppEnvironment::Staging,
            Environment::Production => AppEnvironment::Production,
        }
    }
}

/// Channel options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelArg {
    Email,
    Sms,
    Push,
}

impl From<ChannelArg> for Channel {
    fn from(arg: ChannelArg) -> Self {
        match arg {
            ChannelArg::Email => Channel::Email,
            ChannelArg::Sms => Channel::Sms,
            ChannelArg::Push => Channel::Push,
        }
    }
}

impl Cli {
    /// Log level implied by `--verbose` / `--quiet`, if any
    pub fn log_level_override(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }
}
