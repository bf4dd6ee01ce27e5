//! Named shortcuts, one per event type.

use crate::notifications::dispatcher::Notifier;
use crate::notifications::event::{ContactInfo, EventData, EventType, RecipientDescriptor};

impl Notifier {
    async fn notify_contact(&self, event: EventType, contact: ContactInfo, data: EventData) {
        self.send_notification(event, RecipientDescriptor::new(contact, data))
            .await;
    }

    pub async fn order_confirmation(&self, contact: ContactInfo, data: EventData) {
        self.notify_contact(EventType::OrderConfirmation, contact, data)
            .await;
    }

    pub async fn shipment_picked_up(&self, contact: ContactInfo, data: EventData) {
        self.notify_contact(EventType::ShipmentPickedUp, contact, data)
            .await;
    }

    pub async fn in_transit_update(&self, contact: ContactInfo, data: EventData) {
        self.notify_contact(EventType::InTransitUpdate, contact, data)
            .await;
    }

    pub async fn delivery_confirmation(&self, contact: ContactInfo, data: EventData) {
        self.notify_contact(EventType::DeliveryConfirmation, contact, data)
            .await;
    }

    pub async fn invoice_sent(&self, contact: ContactInfo, data: EventData) {
        self.notify_contact(EventType::InvoiceSent, contact, data)
            .await;
    }

    pub async fn payment_received(&self, contact: ContactInfo, data: EventData) {
        self.notify_contact(EventType::PaymentReceived, contact, data)
            .await;
    }
}
