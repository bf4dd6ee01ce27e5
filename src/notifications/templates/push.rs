//! Push templates.
//!
//! The messaging backend only accepts string values in the data payload, so
//! every payload is assembled as JSON and then flattened with [`stringify`].

use std::collections::HashMap;

use serde_json::{Value, json};

use super::{
    PushContent, TemplateContext, amount_text, invoice_path, or_na, order_path, present,
    tracking_path, transit_status,
};
use crate::notifications::event::{EventData, EventType};
use crate::notifications::format::format_date;

/// Renders the push notification for `event`
pub fn render(event: EventType, data: &EventData, ctx: &TemplateContext) -> PushContent {
    let (title, body, payload) = match event {
        EventType::OrderConfirmation => order_confirmation(data),
        EventType::ShipmentPickedUp => shipment_picked_up(data),
        EventType::InTransitUpdate => in_transit_update(data),
        EventType::DeliveryConfirmation => delivery_confirmation(data),
        EventType::InvoiceSent => invoice_sent(data, ctx),
        EventType::PaymentReceived => payment_received(data),
    };

    let mut data = stringify(payload);
    data.insert("type".to_string(), event.as_str().to_string());
    PushContent { title, body, data }
}

fn order_confirmation(data: &EventData) -> (String, String, Value) {
    let mut body = format!("Your order #{} has been confirmed.", or_na(&data.order_number));
    if let Some(address) = present(&data.shipping_address) {
        body.push_str(&format!(" Shipping to {address}."));
    }
    (
        "Order Confirmed".to_string(),
        body,
        json!({
            "orderNumber": data.order_number,
            "customerName": data.customer_name,
            "shippingAddress": data.shipping_address,
            "url": order_path(data),
        }),
    )
}

fn shipment_picked_up(data: &EventData) -> (String, String, Value) {
    let mut body = format!(
        "Your shipment #{} is on its way.",
        or_na(&data.tracking_number)
    );
    if let Some(date) = present(&data.estimated_delivery_date) {
        body.push_str(&format!(" Estimated delivery: {}.", format_date(date)));
    }
    (
        "Shipment Picked Up".to_string(),
        body,
        json!({
            "orderNumber": data.order_number,
            "trackingNumber": data.tracking_number,
            "estimatedDeliveryDate": data.estimated_delivery_date,
            "url": tracking_path(data),
        }),
    )
}

fn in_transit_update(data: &EventData) -> (String, String, Value) {
    let status = transit_status(data);
    let body = match present(&data.location) {
        Some(location) => format!(
            "Shipment #{}: {} at {}",
            or_na(&data.tracking_number),
            status,
            location
        ),
        None => format!("Shipment #{}: {}", or_na(&data.tracking_number), status),
    };
    (
        "Shipment Update".to_string(),
        body,
        json!({
            "orderNumber": data.order_number,
            "trackingNumber": data.tracking_number,
            "status": status,
            "location": data.location,
            "notes": data.notes,
            "url": tracking_path(data),
        }),
    )
}

fn delivery_confirmation(data: &EventData) -> (String, String, Value) {
    let mut body = format!(
        "Your package #{} has been delivered",
        or_na(&data.tracking_number)
    );
    if let Some(signed_by) = present(&data.signed_by) {
        body.push_str(&format!(" and signed for by {signed_by}"));
    }
    body.push('.');
    (
        "Package Delivered".to_string(),
        body,
        json!({
            "orderNumber": data.order_number,
            "trackingNumber": data.tracking_number,
            "signedBy": data.signed_by,
            "url": tracking_path(data),
        }),
    )
}

fn invoice_sent(data: &EventData, ctx: &TemplateContext) -> (String, String, Value) {
    let mut body = format!(
        "Invoice #{} for {} from {} is ready.",
        or_na(&data.invoice_number),
        amount_text(data),
        ctx.app_name
    );
    if let Some(due) = present(&data.due_date) {
        body.push_str(&format!(" Due {}.", format_date(due)));
    }
    (
        "New Invoice".to_string(),
        body,
        json!({
            "invoiceNumber": data.invoice_number,
            "orderNumber": data.order_number,
            "amount": data.amount,
            "currency": data.currency,
            "dueDate": data.due_date,
            "url": invoice_path(data),
        }),
    )
}

fn payment_received(data: &EventData) -> (String, String, Value) {
    (
        "Payment Received".to_string(),
        format!("We received your payment of {}.", amount_text(data)),
        json!({
            "orderNumber": data.order_number,
            "transactionId": data.transaction_id,
            "amount": data.amount,
            "currency": data.currency,
            "paymentMethod": data.payment_method,
            "url": order_path(data),
        }),
    )
}

/// Flattens a JSON object into a string-only map. `null` becomes the empty
/// string and nested values are kept as JSON text.
pub fn stringify(payload: Value) -> HashMap<String, String> {
    match payload {
        Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| (key, value_to_string(value)))
            .collect(),
        _ => HashMap::new(),
    }
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
