//! Check command handler
//!
//! Reports whether each provider has the credentials it needs.

use crate::config::Settings;
use crate::error::AppResult;
use crate::notifications::Channel;

/// Configuration state of one channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelStatus {
    pub channel: Channel,
    pub configured: bool,
    /// Only meaningful for SMS, which is opt-in
    pub enabled: bool,
}

/// Handler for the check command
pub struct CheckCommandHandler {
    config: Settings,
}

impl CheckCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub fn channel_statuses(&self) -> Vec<ChannelStatus> {
        vec![
            ChannelStatus {
                channel: Channel::Email,
                configured: self.config.email.is_configured(),
                enabled: true,
            },
            ChannelStatus {
                channel: Channel::Sms,
                configured: self.config.sms.is_configured(),
                enabled: self.config.sms.enabled,
            },
            ChannelStatus {
                channel: Channel::Push,
                configured: self.config.push.is_configured(),
                enabled: true,
            },
        ]
    }

    /// Print the report. Settings were validated when loaded, so this only
    /// fails if validation is re-run and rejects them.
    pub fn execute(&self) -> AppResult<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid");
        println!(
            "✓ Application: {} ({})",
            self.config.application.name, self.config.application.url
        );
        println!(
            "✓ Channel timeout: {}s",
            self.config.dispatch.channel_timeout_secs
        );

        for status in self.channel_statuses() {
            let mark = if status.configured { "✓" } else { "✗" };
            let state = if status.configured {
                "configured"
            } else {
                "not configured"
            };
            if status.channel == Channel::Sms {
                let flag = if status.enabled { "enabled" } else { "disabled" };
                println!("{mark} {}: {state}, {flag}", status.channel);
            } else {
                println!("{mark} {}: {state}", status.channel);
            }
        }
        Ok(())
    }
}
