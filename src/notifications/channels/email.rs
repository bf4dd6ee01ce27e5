//! Email channel over an SMTP relay.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::config::EmailConfig;
use crate::error::{AppError, AppResult};
use crate::notifications::event::{EventData, EventType};
use crate::notifications::sender::{Channel, ChannelSender, SendResult};
use crate::notifications::templates::{self, EmailContent, TemplateContext};

type SmtpTransport = AsyncSmtpTransport<Tokio1Executor>;

/// Sends rendered emails through the configured SMTP relay.
///
/// The transport (and its connection pool) is built on the first send and
/// reused afterwards. Until `email.user` and `email.password` are both set,
/// every send fails with "Email service not configured".
pub struct EmailSender {
    config: EmailConfig,
    context: TemplateContext,
    transport: OnceCell<SmtpTransport>,
}

impl EmailSender {
    pub fn new(config: EmailConfig, context: TemplateContext) -> Self {
        Self {
            config,
            context,
            transport: OnceCell::new(),
        }
    }

    async fn transport(&self) -> AppResult<&SmtpTransport> {
        self.transport
            .get_or_try_init(|| async { self.build_transport() })
            .await
    }

    fn build_transport(&self) -> AppResult<SmtpTransport> {
        let mut builder = SmtpTransport::relay(&self.config.smtp_host)
            .map_err(|e| AppError::provider(Channel::Email, e.to_string()))?
            .credentials(Credentials::new(
                self.config.user.trim().to_string(),
                self.config.password.clone(),
            ));
        if let Some(port) = self.config.smtp_port {
            builder = builder.port(port);
        }

        debug!(host = %self.config.smtp_host, "SMTP transport initialized");
        Ok(builder.build())
    }

    /// Sender mailbox, `"{name} <{user}>"`
    fn from_mailbox(&self) -> AppResult<Mailbox> {
        let address: Address = self.config.user.trim().parse().map_err(|e| {
            AppError::provider(Channel::Email, format!("Invalid sender address: {e}"))
        })?;
        let name = self
            .config
            .from_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.context.app_name.clone());
        Ok(Mailbox::new(Some(name), address))
    }

    /// Builds the multipart message without touching the network
    fn build_message(&self, destination: &str, content: EmailContent) -> AppResult<Message> {
        let to: Mailbox = destination.trim().parse().map_err(|e| {
            AppError::provider(Channel::Email, format!("Invalid recipient address: {e}"))
        })?;

        Message::builder()
            .from(self.from_mailbox()?)
            .to(to)
            .subject(content.subject)
            .multipart(MultiPart::alternative_plain_html(content.text, content.html))
            .map_err(|e| AppError::provider(Channel::Email, e.to_string()))
    }

    async fn deliver(&self, event: EventType, destination: &str, data: &EventData) -> AppResult<()> {
        if !self.config.is_configured() {
            return Err(AppError::NotConfigured {
                channel: Channel::Email,
            });
        }

        let content = templates::email::render(event, data, &self.context);
        let message = self.build_message(destination, content)?;
        let transport = self.transport().await?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::provider(Channel::Email, e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ChannelSender for EmailSender {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn send(&self, event: EventType, destination: &str, data: &EventData) -> SendResult {
        match self.deliver(event, destination, data).await {
            Ok(()) => {
                debug!(event = %event, "Email sent");
                SendResult::ok()
            }
            Err(e) => {
                warn!(event = %event, error = %e, "Failed to send email");
                SendResult::failed(e.to_string())
            }
        }
    }
}
