//! SMS channel over the Twilio Programmable Messaging REST API.

use std::sync::OnceLock;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::SmsConfig;
use crate::error::{AppError, AppResult};
use crate::external::HTTP_CLIENT;
use crate::notifications::event::{EventData, EventType};
use crate::notifications::sender::{Channel, ChannelSender, SendResult};
use crate::notifications::templates::{self, TemplateContext};

/// Resolved endpoint and credentials of one messaging account
#[derive(Debug)]
struct TwilioClient {
    messages_url: String,
    account_sid: String,
    auth_token: String,
    from: String,
}

impl TwilioClient {
    fn from_config(config: &SmsConfig) -> Self {
        let account_sid = config.account_sid.trim().to_string();
        Self {
            messages_url: format!(
                "{}/2010-04-01/Accounts/{}/Messages.json",
                config.api_base_url.trim_end_matches('/'),
                account_sid
            ),
            account_sid,
            auth_token: config.auth_token.clone(),
            from: config.phone_number.trim().to_string(),
        }
    }

    async fn create_message(&self, to: &str, body: &str) -> AppResult<()> {
        let params = [("To", to), ("From", self.from.as_str()), ("Body", body)];
        let response = HTTP_CLIENT
            .post(&self.messages_url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::provider(Channel::Sms, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        Err(AppError::provider(Channel::Sms, error_message(status, &text)))
    }
}

/// Error body returned by the messaging API
#[derive(Debug, Deserialize)]
struct TwilioError {
    message: Option<String>,
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<TwilioError>(body)
        .ok()
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("SMS provider responded with HTTP {status}"))
}

/// Sends rendered SMS bodies from the configured sender number.
pub struct SmsSender {
    config: SmsConfig,
    context: TemplateContext,
    client: OnceLock<TwilioClient>,
}

impl SmsSender {
    pub fn new(config: SmsConfig, context: TemplateContext) -> Self {
        Self {
            config,
            context,
            client: OnceLock::new(),
        }
    }

    async fn deliver(&self, event: EventType, destination: &str, data: &EventData) -> AppResult<()> {
        if !self.config.is_configured() {
            return Err(AppError::NotConfigured {
                channel: Channel::Sms,
            });
        }

        let client = self
            .client
            .get_or_init(|| TwilioClient::from_config(&self.config));
        let content = templates::sms::render(event, data, &self.context);
        client.create_message(destination.trim(), &content.body).await
    }
}

#[async_trait]
impl ChannelSender for SmsSender {
    fn channel(&self) -> Channel {
        Channel::Sms
    }

    async fn send(&self, event: EventType, destination: &str, data: &EventData) -> SendResult {
        match self.deliver(event, destination, data).await {
            Ok(()) => {
                debug!(event = %event, "SMS sent");
                SendResult::ok()
            }
            Err(e) => {
                warn!(event = %event, error = %e, "Failed to send SMS");
                SendResult::failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::templates::test_context;

    #[tokio::test]
    async fn test_unconfigured_fails_for_every_event() {
        let sender = SmsSender::new(SmsConfig::default(), test_context());
        for event in EventType::ALL {
            let result = sender.send(event, "+15550001111", &EventData::default()).await;
            assert!(!result.success);
            assert_eq!(result.message.as_deref(), Some("SMS service not configured"));
        }
        assert!(sender.client.get().is_none());
    }

    #[test]
    fn test_partial_credentials_are_unconfigured() {
        let config = SmsConfig {
            account_sid: "AC123".to_string(),
            auth_token: "secret".to_string(),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn test_messages_url() {
        let config = SmsConfig {
            account_sid: " AC123 ".to_string(),
            auth_token: "secret".to_string(),
            phone_number: "+15550000000".to_string(),
            api_base_url: "https://api.twilio.com/".to_string(),
            ..Default::default()
        };
        let client = TwilioClient::from_config(&config);
        assert_eq!(
            client.messages_url,
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
        assert_eq!(client.from, "+15550000000");
    }

    #[test]
    fn test_error_message_prefers_provider_text() {
        let status = reqwest::StatusCode::BAD_REQUEST;
        let body = r#"{"code":21211,"message":"The 'To' number is not a valid phone number.","status":400}"#;
        assert_eq!(
            error_message(status, body),
            "The 'To' number is not a valid phone number."
        );
        assert_eq!(
            error_message(status, "<html>oops</html>"),
            "SMS provider responded with HTTP 400 Bad Request"
        );
    }
}
