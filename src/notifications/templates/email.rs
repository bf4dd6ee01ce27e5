//! Email templates.
//!
//! Every body shares one layout. Values taken from [`EventData`] are escaped
//! before interpolation and the plain-text part is always derived from the
//! finished HTML.

use super::{
    EmailContent, TemplateContext, amount_text, date_text, invoice_path, or_na, order_path,
    present, tracking_path, transit_status,
};
use crate::notifications::event::{EventData, EventType};
use crate::notifications::format::{escape_html, html_to_text};

/// Renders the email for `event`
pub fn render(event: EventType, data: &EventData, ctx: &TemplateContext) -> EmailContent {
    match event {
        EventType::OrderConfirmation => order_confirmation(data, ctx),
        EventType::ShipmentPickedUp => shipment_picked_up(data, ctx),
        EventType::InTransitUpdate => in_transit_update(data, ctx),
        EventType::DeliveryConfirmation => delivery_confirmation(data, ctx),
        EventType::InvoiceSent => invoice_sent(data, ctx),
        EventType::PaymentReceived => payment_received(data, ctx),
    }
}

fn order_confirmation(data: &EventData, ctx: &TemplateContext) -> EmailContent {
    let subject = format!("Order Confirmation - #{}", or_na(&data.order_number));
    let intro = format!(
        "<p>Hi {},</p><p>Thank you for your order. We have received it and will let you know as soon as it ships.</p>",
        escape_html(present(&data.customer_name).unwrap_or("there"))
    );
    let rows = details(&[
        ("Order Number", or_na(&data.order_number).to_string()),
        ("Shipping Address", or_na(&data.shipping_address).to_string()),
    ]);
    let body = format!("{intro}{rows}");
    build(
        subject,
        "Order Confirmed",
        &body,
        ("View Order", ctx.link(&order_path(data))),
        ctx,
    )
}

fn shipment_picked_up(data: &EventData, ctx: &TemplateContext) -> EmailContent {
    let subject = format!(
        "Your Shipment Has Been Picked Up - #{}",
        or_na(&data.tracking_number)
    );
    let intro = "<p>Good news! The carrier has picked up your shipment and it is on its way.</p>";
    let rows = details(&[
        ("Order Number", or_na(&data.order_number).to_string()),
        ("Tracking Number", or_na(&data.tracking_number).to_string()),
        (
            "Estimated Delivery",
            date_text(&data.estimated_delivery_date),
        ),
    ]);
    let body = format!("{intro}{rows}");
    build(
        subject,
        "Shipment Picked Up",
        &body,
        ("Track Shipment", ctx.link(&tracking_path(data))),
        ctx,
    )
}

fn in_transit_update(data: &EventData, ctx: &TemplateContext) -> EmailContent {
    let status = transit_status(data);
    let subject = format!(
        "Shipment Update: {} - #{}",
        status,
        or_na(&data.tracking_number)
    );
    let intro = format!(
        "<p>There is a new update on your shipment: <strong>{}</strong>.</p>",
        escape_html(status)
    );
    let mut fields = vec![
        ("Order Number", or_na(&data.order_number).to_string()),
        ("Tracking Number", or_na(&data.tracking_number).to_string()),
        ("Status", status.to_string()),
    ];
    if let Some(location) = present(&data.location) {
        fields.push(("Current Location", location.to_string()));
    }
    if let Some(notes) = present(&data.notes) {
        fields.push(("Notes", notes.to_string()));
    }
    let body = format!("{intro}{}", details(&fields));
    build(
        subject,
        "Shipment Update",
        &body,
        ("Track Shipment", ctx.link(&tracking_path(data))),
        ctx,
    )
}

fn delivery_confirmation(data: &EventData, ctx: &TemplateContext) -> EmailContent {
    let subject = format!(
        "Your Package Has Been Delivered - #{}",
        or_na(&data.tracking_number)
    );
    let intro = "<p>Your package has been delivered. We hope you enjoy it!</p>";
    let mut fields = vec![
        ("Order Number", or_na(&data.order_number).to_string()),
        ("Tracking Number", or_na(&data.tracking_number).to_string()),
    ];
    if let Some(signed_by) = present(&data.signed_by) {
        fields.push(("Signed By", signed_by.to_string()));
    }
    let body = format!("{intro}{}", details(&fields));
    build(
        subject,
        "Package Delivered",
        &body,
        ("View Order", ctx.link(&order_path(data))),
        ctx,
    )
}

fn invoice_sent(data: &EventData, ctx: &TemplateContext) -> EmailContent {
    let subject = format!(
        "Invoice #{} from {}",
        or_na(&data.invoice_number),
        ctx.app_name
    );
    let intro = "<p>A new invoice is ready for you. Please review it and complete payment by the due date.</p>";
    let rows = details(&[
        ("Invoice Number", or_na(&data.invoice_number).to_string()),
        ("Order Number", or_na(&data.order_number).to_string()),
        ("Amount Due", amount_text(data)),
        ("Due Date", date_text(&data.due_date)),
    ]);
    let body = format!("{intro}{rows}");
    build(
        subject,
        "New Invoice",
        &body,
        ("View Invoice", ctx.link(&invoice_path(data))),
        ctx,
    )
}

fn payment_received(data: &EventData, ctx: &TemplateContext) -> EmailContent {
    let subject = "Payment Received - Thank You!".to_string();
    let intro = format!(
        "<p>We have received your payment of <strong>{}</strong>. Thank you!</p>",
        escape_html(&amount_text(data))
    );
    let rows = details(&[
        ("Amount", amount_text(data)),
        ("Payment Method", or_na(&data.payment_method).to_string()),
        ("Transaction ID", or_na(&data.transaction_id).to_string()),
        ("Order Number", or_na(&data.order_number).to_string()),
    ]);
    let body = format!("{intro}{rows}");
    build(
        subject,
        "Payment Received",
        &body,
        ("View Order", ctx.link(&order_path(data))),
        ctx,
    )
}

/// Two-column table of label/value rows, values escaped
fn details(rows: &[(&str, String)]) -> String {
    let mut html = String::from(
        r#"<table role="presentation" style="width:100%;border-collapse:collapse;margin:16px 0">"#,
    );
    for (label, value) in rows {
        html.push_str(&format!(
            r#"<tr><td style="padding:6px 0;color:#6b7280">{}</td><td style="padding:6px 0;font-weight:600">{}</td></tr>"#,
            label,
            escape_html(value)
        ));
    }
    html.push_str("</table>");
    html
}

fn build(
    subject: String,
    heading: &str,
    body: &str,
    (cta_label, cta_href): (&str, String),
    ctx: &TemplateContext,
) -> EmailContent {
    let app_name = escape_html(&ctx.app_name);
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body style="margin:0;padding:0;background:#f3f4f6;font-family:Arial,Helvetica,sans-serif;color:#111827">
<div style="max-width:600px;margin:0 auto;background:#ffffff;padding:32px">
<h1 style="font-size:22px;margin:0 0 16px">{heading}</h1>
{body}
<p><a href="{href}" style="display:inline-block;padding:10px 18px;background:#2563eb;color:#ffffff;text-decoration:none;border-radius:4px">{cta_label}</a></p>
<p style="font-size:12px;color:#9ca3af">You are receiving this email because of activity on your {app_name} account.</p>
<p style="font-size:12px;color:#9ca3af">© {app_name}</p>
</div>
</body>
</html>"#,
        title = escape_html(&subject),
        href = escape_html(&cta_href),
    );
    let text = html_to_text(&html);
    EmailContent {
        subject,
        html,
        text,
    }
}
