//! Per-channel template registries.
//!
//! Each registry is one exhaustive `match` over
//! [`EventType`](crate::notifications::EventType), which makes a
//! missing entry a compile error. Rendering is pure: no I/O and no panics on
//! missing fields.

pub mod email;
pub mod push;
pub mod sms;

use std::collections::HashMap;

use serde::Serialize;

use crate::config::ApplicationConfig;
use crate::notifications::event::EventData;
use crate::notifications::format::{DEFAULT_CURRENCY, PLACEHOLDER, format_currency, format_date};

#[cfg(test)]
pub(crate) use tests::{core_values, full_data, test_context};

/// Branding shared by every template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContext {
    pub app_name: String,
    /// Base URL without a trailing slash
    pub app_url: String,
}

impl TemplateContext {
    pub fn new(app_name: impl Into<String>, app_url: impl Into<String>) -> Self {
        let app_url: String = app_url.into();
        Self {
            app_name: app_name.into(),
            app_url: app_url.trim_end_matches('/').to_string(),
        }
    }

    /// Absolute link for an in-app path such as `/tracking/TRK-1`
    pub fn link(&self, path: &str) -> String {
        format!("{}{}", self.app_url, path)
    }
}

impl From<&ApplicationConfig> for TemplateContext {
    fn from(config: &ApplicationConfig) -> Self {
        Self::new(config.name.clone(), config.url.clone())
    }
}

/// Rendered email
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
    /// Always derived from `html`
    pub text: String,
}

/// Rendered SMS
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmsContent {
    pub body: String,
}

/// Rendered push notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushContent {
    pub title: String,
    pub body: String,
    /// String-only payload, carries `type` and a deep-link `url`
    pub data: HashMap<String, String>,
}

/// Trimmed value of an optional field, `None` when blank
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn or_na(value: &Option<String>) -> &str {
    present(value).unwrap_or(PLACEHOLDER)
}

fn amount_text(data: &EventData) -> String {
    match data.amount {
        Some(amount) => format_currency(amount, present(&data.currency).unwrap_or(DEFAULT_CURRENCY)),
        None => PLACEHOLDER.to_string(),
    }
}

fn date_text(value: &Option<String>) -> String {
    present(value)
        .map(format_date)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn transit_status(data: &EventData) -> &str {
    present(&data.status).unwrap_or("In Transit")
}

fn order_path(data: &EventData) -> String {
    match present(&data.order_number) {
        Some(order) => format!("/orders/{order}"),
        None => "/orders".to_string(),
    }
}

fn tracking_path(data: &EventData) -> String {
    match present(&data.tracking_number) {
        Some(tracking) => format!("/tracking/{tracking}"),
        None => "/tracking".to_string(),
    }
}

fn invoice_path(data: &EventData) -> String {
    match present(&data.invoice_number) {
        Some(invoice) => format!("/invoices/{invoice}"),
        None => "/invoices".to_string(),
    }
}
