//! Business events and the recipient contract.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The business occurrence that triggered a notification.
///
/// Every template registry matches on this enum exhaustively, so a new
/// variant does not compile until all three channels can render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    OrderConfirmation,
    ShipmentPickedUp,
    InTransitUpdate,
    DeliveryConfirmation,
    InvoiceSent,
    PaymentReceived,
}

impl EventType {
    pub const ALL: [EventType; 6] = [
        EventType::OrderConfirmation,
        EventType::ShipmentPickedUp,
        EventType::InTransitUpdate,
        EventType::DeliveryConfirmation,
        EventType::InvoiceSent,
        EventType::PaymentReceived,
    ];

    /// Wire name, e.g. `order_confirmation`
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::OrderConfirmation => "order_confirmation",
            EventType::ShipmentPickedUp => "shipment_picked_up",
            EventType::InTransitUpdate => "in_transit_update",
            EventType::DeliveryConfirmation => "delivery_confirmation",
            EventType::InvoiceSent => "invoice_sent",
            EventType::PaymentReceived => "payment_received",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown event type '{0}'. Valid values are: order_confirmation, shipment_picked_up, in_transit_update, delivery_confirmation, invoice_sent, payment_received")]
pub struct ParseEventTypeError(String);

impl FromStr for EventType {
    type Err = ParseEventTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        EventType::ALL
            .into_iter()
            .find(|event| event.as_str() == normalized)
            .ok_or_else(|| ParseEventTypeError(s.to_string()))
    }
}

/// Fields a template may use. Every field is optional and templates fall
/// back to a placeholder or drop the line when one is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventData {
    pub order_number: Option<String>,
    pub customer_name: Option<String>,
    pub shipping_address: Option<String>,
    pub tracking_number: Option<String>,
    pub estimated_delivery_date: Option<String>,
    /// Overrides the "In Transit" label of progress updates
    pub status: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub signed_by: Option<String>,
    pub invoice_number: Option<String>,
    pub amount: Option<f64>,
    /// ISO 4217 code, USD when absent
    pub currency: Option<String>,
    pub due_date: Option<String>,
    #[serde(alias = "method")]
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
}

/// Known contact addresses of one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub user_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub push_token: Option<String>,
}

/// One notification attempt to one person across up to three channels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipientDescriptor {
    pub user_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub push_token: Option<String>,
    pub data: EventData,
}

impl RecipientDescriptor {
    pub fn new(contact: ContactInfo, data: EventData) -> Self {
        Self {
            user_id: contact.user_id,
            email: contact.email,
            phone: contact.phone,
            push_token: contact.push_token,
            data,
        }
    }

    pub fn email(&self) -> Option<&str> {
        non_blank(&self.email)
    }

    pub fn phone(&self) -> Option<&str> {
        non_blank(&self.phone)
    }

    pub fn push_token(&self) -> Option<&str> {
        non_blank(&self.push_token)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
