//! In-memory senders for dispatcher tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::notifications::event::{EventData, EventType};
use crate::notifications::sender::{Channel, ChannelSender, SendResult};
use crate::notifications::templates::{self, EmailContent, TemplateContext};

#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    Succeed,
    Fail,
    Panic,
    Hang,
}

/// Counts calls and remembers the last one
pub struct FakeSender {
    channel: Channel,
    behavior: Behavior,
    calls: AtomicUsize,
    last: Mutex<Option<(EventType, String, EventData)>>,
}

impl FakeSender {
    pub fn new(channel: Channel, behavior: Behavior) -> Self {
        Self {
            channel,
            behavior,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> Option<(EventType, String, EventData)> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChannelSender for FakeSender {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn send(&self, event: EventType, destination: &str, data: &EventData) -> SendResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some((event, destination.to_string(), data.clone()));

        match self.behavior {
            Behavior::Succeed => SendResult::ok(),
            Behavior::Fail => SendResult::failed("provider exploded"),
            Behavior::Panic => panic!("{} sender panicked", self.channel),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                SendResult::ok()
            }
        }
    }
}

/// Email sender that renders like the real one and keeps what it rendered
pub struct RenderingEmailSender {
    context: TemplateContext,
    pub sent: Mutex<Vec<(String, EmailContent)>>,
}

impl RenderingEmailSender {
    pub fn new(context: TemplateContext) -> Self {
        Self {
            context,
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChannelSender for RenderingEmailSender {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn send(&self, event: EventType, destination: &str, data: &EventData) -> SendResult {
        let content = templates::email::render(event, data, &self.context);
        self.sent
            .lock()
            .unwrap()
            .push((destination.to_string(), content));
        SendResult::ok()
    }
}
