//! Send command handler
//!
//! Dispatches one event through the real providers and prints each
//! channel's outcome.

use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::notifications::{Notifier, RecipientDescriptor};
use crate::notifications::{EventType, SendResult};

/// Handler for the send command
pub struct SendCommandHandler {
    notifier: Notifier,
}

impl SendCommandHandler {
    pub fn new(config: &Settings) -> Self {
        Self {
            notifier: Notifier::from_settings(config),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_notifier(notifier: Notifier) -> Self {
        Self { notifier }
    }

    /// Fails only when the recipient has no usable destination; channel
    /// failures are reported, not returned.
    pub async fn execute(&self, event: EventType, recipient: RecipientDescriptor) -> AppResult<Vec<SendResult>> {
        if recipient.email().is_none() && recipient.phone().is_none() && recipient.push_token().is_none() {
            return Err(AppError::Validation {
                field: "recipient".to_string(),
                reason: "at least one of --email, --phone or --push-token is required".to_string(),
            });
        }

        let outcomes = self.notifier.dispatch(event, recipient).await;
        if outcomes.is_empty() {
            println!("Nothing sent: SMS is disabled and no other destination was given");
        }

        let mut results = Vec::with_capacity(outcomes.len());
        for (channel, result) in outcomes {
            match &result.message {
                None => println!("✓ {channel}: sent"),
                Some(message) => println!("✗ {channel}: {message}"),
            }
            results.push(result);
        }
        Ok(results)
    }
}
