//! SMS templates. Plain single-line bodies prefixed with the application name.

use super::{
    SmsContent, TemplateContext, amount_text, date_text, or_na, present, tracking_path,
    transit_status,
};
use crate::notifications::event::{EventData, EventType};

/// Renders the SMS body for `event`
pub fn render(event: EventType, data: &EventData, ctx: &TemplateContext) -> SmsContent {
    let body = match event {
        EventType::OrderConfirmation => order_confirmation(data),
        EventType::ShipmentPickedUp => shipment_picked_up(data),
        EventType::InTransitUpdate => in_transit_update(data, ctx),
        EventType::DeliveryConfirmation => delivery_confirmation(data),
        EventType::InvoiceSent => invoice_sent(data),
        EventType::PaymentReceived => payment_received(data),
    };
    SmsContent {
        body: format!("{}: {}", ctx.app_name, body),
    }
}

/// ` (order #ORD-1)`, or nothing when the order number is absent
fn order_clause(data: &EventData) -> String {
    present(&data.order_number)
        .map(|order| format!(" (order #{order})"))
        .unwrap_or_default()
}

fn order_confirmation(data: &EventData) -> String {
    let mut body = match present(&data.customer_name) {
        Some(name) => format!("Hi {name}, your order #"),
        None => "Your order #".to_string(),
    };
    body.push_str(or_na(&data.order_number));
    body.push_str(" has been confirmed");
    if let Some(address) = present(&data.shipping_address) {
        body.push_str(&format!(" and will ship to {address}"));
    }
    body.push_str(". We'll notify you when it ships.");
    body
}

fn shipment_picked_up(data: &EventData) -> String {
    format!(
        "Your shipment #{}{} has been picked up. Estimated delivery: {}.",
        or_na(&data.tracking_number),
        order_clause(data),
        date_text(&data.estimated_delivery_date)
    )
}

fn in_transit_update(data: &EventData, ctx: &TemplateContext) -> String {
    let mut body = format!(
        "Shipment #{}{} update: {}",
        or_na(&data.tracking_number),
        order_clause(data),
        transit_status(data)
    );
    if let Some(location) = present(&data.location) {
        body.push_str(&format!(" at {location}"));
    }
    body.push('.');
    if let Some(notes) = present(&data.notes) {
        body.push_str(&format!(" Note: {notes}."));
    }
    body.push_str(&format!(" Track: {}", ctx.link(&tracking_path(data))));
    body
}

fn delivery_confirmation(data: &EventData) -> String {
    let mut body = format!(
        "Your package #{}{} has been delivered",
        or_na(&data.tracking_number),
        order_clause(data)
    );
    if let Some(signed_by) = present(&data.signed_by) {
        body.push_str(&format!(" and signed for by {signed_by}"));
    }
    body.push('.');
    body
}

fn invoice_sent(data: &EventData) -> String {
    format!(
        "Invoice #{}{} for {} is due {}.",
        or_na(&data.invoice_number),
        order_clause(data),
        amount_text(data),
        date_text(&data.due_date)
    )
}

fn payment_received(data: &EventData) -> String {
    let mut body = format!("Payment of {} received", amount_text(data));
    if let Some(method) = present(&data.payment_method) {
        body.push_str(&format!(" via {method}"));
    }
    if let Some(order) = present(&data.order_number) {
        body.push_str(&format!(" for order #{order}"));
    }
    body.push_str(&format!(
        ". Transaction ID: {}. Thank you!",
        or_na(&data.transaction_id)
    ));
    body
}
