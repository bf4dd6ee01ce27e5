//! Fan-out of one notification to every channel the recipient can be
//! reached on.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::runtime::Handle;
use tracing::{Instrument, debug, error, info_span, warn};
use uuid::Uuid;

use crate::config::Settings;
use crate::error::AppError;
use crate::notifications::channels::{EmailSender, PushSender, SmsSender};
use crate::notifications::event::{EventData, EventType, RecipientDescriptor};
use crate::notifications::sender::{Channel, ChannelSender, SendResult};
use crate::notifications::templates::TemplateContext;

/// Entry point for sending notifications.
///
/// Cheap to clone: the senders are shared, so every clone reuses the same
/// provider clients.
///
/// # Example
/// ```no_run
/// use parcel_notify::config::Settings;
/// use parcel_notify::notifications::{EventData, EventType, Notifier, RecipientDescriptor};
///
/// # async fn run(settings: Settings) {
/// let notifier = Notifier::from_settings(&settings);
/// let recipient = RecipientDescriptor {
///     user_id: "user-1".to_string(),
///     email: Some("a@b.com".to_string()),
///     data: EventData {
///         order_number: Some("ORD-7".to_string()),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// notifier.send_notification(EventType::OrderConfirmation, recipient).await;
/// # }
/// ```
#[derive(Clone)]
pub struct Notifier {
    email: Arc<dyn ChannelSender>,
    sms: Arc<dyn ChannelSender>,
    push: Arc<dyn ChannelSender>,
    /// SMS is opt-in, email and push are always attempted
    sms_enabled: bool,
    channel_timeout: Duration,
}

impl Notifier {
    pub fn new(
        email: Arc<dyn ChannelSender>,
        sms: Arc<dyn ChannelSender>,
        push: Arc<dyn ChannelSender>,
        sms_enabled: bool,
        channel_timeout: Duration,
    ) -> Self {
        Self {
            email,
            sms,
            push,
            sms_enabled,
            channel_timeout,
        }
    }

    /// Builds the provider-backed senders from settings.
    ///
    /// Never fails: a channel without credentials is still wired in and
    /// reports "not configured" when used.
    pub fn from_settings(settings: &Settings) -> Self {
        let context = TemplateContext::from(&settings.application);
        Self::new(
            Arc::new(EmailSender::new(settings.email.clone(), context.clone())),
            Arc::new(SmsSender::new(settings.sms.clone(), context.clone())),
            Arc::new(PushSender::new(settings.push.clone(), context)),
            settings.sms.enabled,
            settings.dispatch.channel_timeout(),
        )
    }

    /// Senders to invoke for this recipient, with their destinations
    fn targets(&self, recipient: &RecipientDescriptor) -> Vec<(Arc<dyn ChannelSender>, String)> {
        let mut targets = Vec::with_capacity(3);
        if let Some(email) = recipient.email() {
            targets.push((Arc::clone(&self.email), email.to_string()));
        }
        if let Some(phone) = recipient.phone() {
            if self.sms_enabled {
                targets.push((Arc::clone(&self.sms), phone.to_string()));
            } else {
                debug!("SMS disabled, skipping phone number");
            }
        }
        if let Some(token) = recipient.push_token() {
            targets.push((Arc::clone(&self.push), token.to_string()));
        }
        targets
    }

    /// Attempts delivery on every channel the recipient has.
    ///
    /// Completes once every attempt has finished or timed out. Failures are
    /// logged and never returned.
    pub async fn send_notification(&self, event: EventType, recipient: RecipientDescriptor) {
        self.dispatch(event, recipient).await;
    }

    /// Same as [`send_notification`](Self::send_notification) but returns
    /// immediately, leaving the dispatch running on the current runtime.
    ///
    /// Outside a tokio runtime the notification is dropped with an error log.
    pub fn spawn_notification(&self, event: EventType, recipient: RecipientDescriptor) {
        match Handle::try_current() {
            Ok(handle) => {
                let notifier = self.clone();
                handle.spawn(async move {
                    notifier.send_notification(event, recipient).await;
                });
            }
            Err(e) => {
                error!(event = %event, error = %e, "No async runtime, notification dropped");
            }
        }
    }

    /// Runs the fan-out and hands back each channel's outcome
    pub(crate) async fn dispatch(
        &self,
        event: EventType,
        recipient: RecipientDescriptor,
    ) -> Vec<(Channel, SendResult)> {
        let span = info_span!(
            "notification",
            notification_id = %Uuid::new_v4(),
            event = %event,
            user_id = %recipient.user_id,
        );

        async move {
            let targets = self.targets(&recipient);
            if targets.is_empty() {
                debug!("Recipient has no reachable channel");
                return Vec::new();
            }

            let data = Arc::new(recipient.data);
            let (channels, tasks): (Vec<_>, Vec<_>) = targets
                .into_iter()
                .map(|(sender, destination)| {
                    let channel = sender.channel();
                    let data = Arc::clone(&data);
                    let timeout = self.channel_timeout;
                    let task = tokio::spawn(
                        attempt(sender, event, destination, data, timeout).in_current_span(),
                    );
                    (channel, task)
                })
                .unzip();

            let outcomes = join_all(tasks).await;
            channels
                .into_iter()
                .zip(outcomes)
                .map(|(channel, outcome)| {
                    let result = match outcome {
                        Ok(result) => result,
                        Err(e) => {
                            error!(channel = channel.as_str(), error = %e, "Channel task aborted");
                            SendResult::failed(format!("{channel} delivery aborted"))
                        }
                    };
                    debug!(
                        channel = channel.as_str(),
                        success = result.success,
                        message = result.message.as_deref().unwrap_or_default(),
                        "Channel attempt finished"
                    );
                    (channel, result)
                })
                .collect()
        }
        .instrument(span)
        .await
    }
}

/// One channel attempt bounded by `timeout`
async fn attempt(
    sender: Arc<dyn ChannelSender>,
    event: EventType,
    destination: String,
    data: Arc<EventData>,
    timeout: Duration,
) -> SendResult {
    let channel = sender.channel();
    match tokio::time::timeout(timeout, sender.send(event, &destination, &data)).await {
        Ok(result) => result,
        Err(_) => {
            let err = AppError::Timeout {
                channel,
                millis: timeout.as_millis(),
            };
            warn!(channel = channel.as_str(), error = %err, "Channel attempt timed out");
            SendResult::from(Err(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::fakes::{Behavior, FakeSender};

    struct Harness {
        email: Arc<FakeSender>,
        sms: Arc<FakeSender>,
        push: Arc<FakeSender>,
    }

    impl Harness {
        fn new(email: Behavior, sms: Behavior, push: Behavior) -> Self {
            Self {
                email: Arc::new(FakeSender::new(Channel::Email, email)),
                sms: Arc::new(FakeSender::new(Channel::Sms, sms)),
                push: Arc::new(FakeSender::new(Channel::Push, push)),
            }
        }

        fn succeeding() -> Self {
            Self::new(Behavior::Succeed, Behavior::Succeed, Behavior::Succeed)
        }

        fn notifier(&self, sms_enabled: bool) -> Notifier {
            Notifier::new(
                self.email.clone(),
                self.sms.clone(),
                self.push.clone(),
                sms_enabled,
                Duration::from_millis(200),
            )
        }

        fn counts(&self) -> (usize, usize, usize) {
            (self.email.calls(), self.sms.calls(), self.push.calls())
        }
    }

    fn everyone() -> RecipientDescriptor {
        RecipientDescriptor {
            user_id: "user-1".to_string(),
            email: Some("a@b.com".to_string()),
            phone: Some("+15550001111".to_string()),
            push_token: Some("device-1".to_string()),
            data: EventData {
                order_number: Some("ORD-1".to_string()),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_all_destinations_fan_out_once_each() {
        let harness = Harness::succeeding();
        harness
            .notifier(true)
            .send_notification(EventType::OrderConfirmation, everyone())
            .await;

        assert_eq!(harness.counts(), (1, 1, 1));
        let (event, destination, data) = harness.sms.last_call().unwrap();
        assert_eq!(event, EventType::OrderConfirmation);
        assert_eq!(destination, "+15550001111");
        assert_eq!(data.order_number.as_deref(), Some("ORD-1"));
    }

    #[tokio::test]
    async fn test_email_only_recipient() {
        let harness = Harness::succeeding();
        let recipient = RecipientDescriptor {
            user_id: "user-2".to_string(),
            email: Some("a@b.com".to_string()),
            ..Default::default()
        };
        harness
            .notifier(true)
            .send_notification(EventType::InvoiceSent, recipient)
            .await;

        assert_eq!(harness.counts(), (1, 0, 0));
    }

    #[tokio::test]
    async fn test_sms_disabled_skips_phone() {
        let harness = Harness::succeeding();
        harness
            .notifier(false)
            .send_notification(EventType::ShipmentPickedUp, everyone())
            .await;

        assert_eq!(harness.counts(), (1, 0, 1));
    }

    #[tokio::test]
    async fn test_no_destinations_sends_nothing() {
        let harness = Harness::succeeding();
        let recipient = RecipientDescriptor {
            user_id: "user-3".to_string(),
            email: Some("   ".to_string()),
            ..Default::default()
        };
        let outcomes = harness
            .notifier(true)
            .dispatch(EventType::PaymentReceived, recipient)
            .await;

        assert!(outcomes.is_empty());
        assert_eq!(harness.counts(), (0, 0, 0));
    }

    #[tokio::test]
    async fn test_failing_email_does_not_block_other_channels() {
        let harness = Harness::new(Behavior::Fail, Behavior::Succeed, Behavior::Succeed);
        let outcomes = harness
            .notifier(true)
            .dispatch(EventType::DeliveryConfirmation, everyone())
            .await;

        assert_eq!(harness.counts(), (1, 1, 1));
        assert_eq!(
            outcomes,
            vec![
                (Channel::Email, SendResult::failed("provider exploded")),
                (Channel::Sms, SendResult::ok()),
                (Channel::Push, SendResult::ok()),
            ]
        );
    }

    #[tokio::test]
    async fn test_panicking_channel_is_contained() {
        let harness = Harness::new(Behavior::Panic, Behavior::Succeed, Behavior::Succeed);
        let outcomes = harness
            .notifier(true)
            .dispatch(EventType::InTransitUpdate, everyone())
            .await;

        assert_eq!(harness.counts(), (1, 1, 1));
        assert_eq!(outcomes[0].0, Channel::Email);
        assert!(!outcomes[0].1.success);
        assert!(outcomes[1].1.success);
        assert!(outcomes[2].1.success);
    }

    #[tokio::test]
    async fn test_hanging_channel_times_out() {
        let harness = Harness::new(Behavior::Succeed, Behavior::Succeed, Behavior::Hang);
        let started = std::time::Instant::now();
        let outcomes = harness
            .notifier(true)
            .dispatch(EventType::OrderConfirmation, everyone())
            .await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(outcomes[0].1.success);
        assert!(outcomes[1].1.success);
        assert_eq!(outcomes[2].0, Channel::Push);
        assert_eq!(
            outcomes[2].1.message.as_deref(),
            Some("Push delivery timed out after 200ms")
        );
    }

    #[tokio::test]
    async fn test_spawn_notification_runs_in_background() {
        let harness = Harness::succeeding();
        harness
            .notifier(true)
            .spawn_notification(EventType::OrderConfirmation, everyone());

        for _ in 0..100 {
            if harness.counts() == (1, 1, 1) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("background dispatch did not run: {:?}", harness.counts());
    }

    #[test]
    fn test_spawn_notification_without_runtime_is_noop() {
        let harness = Harness::succeeding();
        harness
            .notifier(true)
            .spawn_notification(EventType::OrderConfirmation, everyone());
        assert_eq!(harness.counts(), (0, 0, 0));
    }

    #[tokio::test]
    async fn test_unconfigured_settings_never_fail_the_caller() {
        let notifier = Notifier::from_settings(&Settings::default());
        let outcomes = notifier
            .dispatch(EventType::PaymentReceived, everyone())
            .await;

        // SMS is disabled by default
        assert_eq!(outcomes.len(), 2);
        assert_eq!(
            outcomes[0].1.message.as_deref(),
            Some("Email service not configured")
        );
        assert_eq!(
            outcomes[1].1.message.as_deref(),
            Some("Push service not configured")
        );
    }
}
