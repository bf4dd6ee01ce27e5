//! Render command handler
//!
//! Prints the rendered content of one event for one channel as JSON.

use anyhow::Context;

use crate::config::Settings;
use crate::error::AppResult;
use crate::notifications::templates::{self, TemplateContext};
use crate::notifications::{Channel, EventData, EventType};

/// Handler for the render command
pub struct RenderCommandHandler {
    context: TemplateContext,
}

impl RenderCommandHandler {
    pub fn new(config: &Settings) -> Self {
        Self {
            context: TemplateContext::from(&config.application),
        }
    }

    /// Rendered content as a JSON value
    pub fn render(&self, event: EventType, channel: Channel, data: &EventData) -> AppResult<serde_json::Value> {
        let value = match channel {
            Channel::Email => serde_json::to_value(templates::email::render(event, data, &self.context)),
            Channel::Sms => serde_json::to_value(templates::sms::render(event, data, &self.context)),
            Channel::Push => serde_json::to_value(templates::push::render(event, data, &self.context)),
        }
        .context("Failed to serialize rendered content")?;
        Ok(value)
    }

    pub fn execute(&self, event: EventType, channel: Channel, data: &EventData) -> AppResult<()> {
        let value = self.render(event, channel, data)?;
        let output = serde_json::to_string_pretty(&value).context("Failed to format rendered content")?;
        println!("{output}");
        Ok(())
    }
}
