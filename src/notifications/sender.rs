//! Channel abstraction shared by the dispatcher and the concrete senders.
//!
//! A sender never returns an error to its caller. Every failure, including a
//! missing configuration, is folded into a [`SendResult`] so one broken
//! channel cannot disturb the others.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::notifications::event::{EventData, EventType};

/// Delivery channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
    Push,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Email, Channel::Sms, Channel::Push];

    /// Lowercase identifier used in logs and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
            Channel::Push => "push",
        }
    }
}

/// Human label, as used in "SMS service not configured"
impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Channel::Email => "Email",
            Channel::Sms => "SMS",
            Channel::Push => "Push",
        };
        f.write_str(label)
    }
}

/// Outcome of one delivery attempt on one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    pub success: bool,
    /// Failure description, `None` on success
    pub message: Option<String>,
}

impl SendResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

impl From<AppResult<()>> for SendResult {
    fn from(result: AppResult<()>) -> Self {
        match result {
            Ok(()) => SendResult::ok(),
            Err(err) => SendResult::failed(err.to_string()),
        }
    }
}

/// One delivery channel able to render and send every [`EventType`].
///
/// Implementations must be `Send + Sync` so the dispatcher can run them on
/// separate tasks.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    /// Channel this sender delivers on
    fn channel(&self) -> Channel;

    /// Renders the event for this channel and delivers it to `destination`.
    ///
    /// Never fails: provider errors, invalid destinations and missing
    /// configuration all come back as `SendResult { success: false, .. }`.
    async fn send(&self, event: EventType, destination: &str, data: &EventData) -> SendResult;
}
