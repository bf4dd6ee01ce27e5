//! Outbound notification dispatch.
//!
//! A business event plus a recipient's contact addresses fans out to email,
//! SMS and push independently. Each channel renders its own template, talks
//! to its own provider and reports failure as a [`SendResult`] instead of an
//! error, so one broken provider never affects the others.

pub mod channels;
pub mod dispatcher;
pub mod event;
pub mod format;
mod helpers;
pub mod sender;
pub mod templates;

#[cfg(test)]
pub(crate) mod fakes;

pub use channels::{EmailSender, PushSender, PushTarget, SmsSender};
pub use dispatcher::Notifier;
pub use event::{ContactInfo, EventData, EventType, ParseEventTypeError, RecipientDescriptor};
pub use sender::{Channel, ChannelSender, SendResult};
pub use templates::{EmailContent, PushContent, SmsContent, TemplateContext};
