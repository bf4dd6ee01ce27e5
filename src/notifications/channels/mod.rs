//! Provider-backed channel senders

pub mod email;
pub mod push;
pub mod sms;

pub use email::EmailSender;
pub use push::{PushSender, PushTarget};
pub use sms::SmsSender;
