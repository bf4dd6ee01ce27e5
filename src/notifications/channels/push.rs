//! Push channel over the Firebase Cloud Messaging HTTP v1 API.

use async_trait::async_trait;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::config::PushConfig;
use crate::error::{AppError, AppResult};
use crate::external::HTTP_CLIENT;
use crate::notifications::event::{EventData, EventType};
use crate::notifications::sender::{Channel, ChannelSender, SendResult};
use crate::notifications::templates::{self, PushContent, TemplateContext};

const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

/// Where a message is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushTarget<'a> {
    /// A single device registration token
    Device(&'a str),
    /// Every device subscribed to a topic
    Topic(&'a str),
}

#[derive(Debug, Serialize)]
struct FcmRequest<'a> {
    message: FcmMessage<'a>,
}

#[derive(Debug, Serialize)]
struct FcmMessage<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<&'a str>,
    notification: FcmNotification<'a>,
    data: &'a HashMap<String, String>,
}

#[derive(Debug, Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct FcmErrorBody {
    error: Option<FcmErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct FcmErrorDetail {
    message: Option<String>,
}

/// The only field read from the service-account key besides what the token
/// provider needs
#[derive(Debug, Deserialize)]
struct ServiceAccountProject {
    project_id: String,
}

fn build_request<'a>(target: PushTarget<'a>, content: &'a PushContent) -> FcmRequest<'a> {
    let (token, topic) = match target {
        PushTarget::Device(token) => (Some(token), None),
        PushTarget::Topic(topic) => (None, Some(topic)),
    };
    FcmRequest {
        message: FcmMessage {
            token,
            topic,
            notification: FcmNotification {
                title: &content.title,
                body: &content.body,
            },
            data: &content.data,
        },
    }
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<FcmErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Push provider responded with HTTP {status}"))
}

/// Authenticated messaging handle for one Firebase project
struct FcmClient {
    account: CustomServiceAccount,
    send_url: String,
}

impl FcmClient {
    fn from_config(config: &PushConfig) -> AppResult<Self> {
        let json = config.service_account.trim();
        let project: ServiceAccountProject = serde_json::from_str(json).map_err(|e| {
            AppError::provider(Channel::Push, format!("Invalid service account: {e}"))
        })?;
        let account = CustomServiceAccount::from_json(json).map_err(|e| {
            AppError::provider(Channel::Push, format!("Invalid service account: {e}"))
        })?;

        debug!(project_id = %project.project_id, "FCM client initialized");
        Ok(Self {
            account,
            send_url: format!(
                "{}/v1/projects/{}/messages:send",
                config.api_base_url.trim_end_matches('/'),
                project.project_id
            ),
        })
    }

    async fn send(&self, request: &FcmRequest<'_>) -> AppResult<()> {
        let token = self
            .account
            .token(&[FCM_SCOPE])
            .await
            .map_err(|e| AppError::provider(Channel::Push, e.to_string()))?;

        let response = HTTP_CLIENT
            .post(&self.send_url)
            .bearer_auth(token.as_str())
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::provider(Channel::Push, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        Err(AppError::provider(Channel::Push, error_message(status, &text)))
    }
}

/// Sends rendered push notifications through FCM.
///
/// The service account is parsed on the first send and the resulting client
/// is kept for the lifetime of the sender. Access tokens are cached and
/// refreshed by `gcp_auth`.
pub struct PushSender {
    config: PushConfig,
    context: TemplateContext,
    client: OnceCell<FcmClient>,
}

impl PushSender {
    pub fn new(config: PushConfig, context: TemplateContext) -> Self {
        Self {
            config,
            context,
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> AppResult<&FcmClient> {
        self.client
            .get_or_try_init(|| async { FcmClient::from_config(&self.config) })
            .await
    }

    async fn deliver(&self, event: EventType, target: PushTarget<'_>, data: &EventData) -> AppResult<()> {
        if !self.config.is_configured() {
            return Err(AppError::NotConfigured {
                channel: Channel::Push,
            });
        }

        let client = self.client().await?;
        let content = templates::push::render(event, data, &self.context);
        client.send(&build_request(target, &content)).await
    }

    /// Broadcasts the event to every device subscribed to `topic`.
    ///
    /// Same failure contract as [`ChannelSender::send`].
    pub async fn send_to_topic(&self, topic: &str, event: EventType, data: &EventData) -> SendResult {
        match self.deliver(event, PushTarget::Topic(topic.trim()), data).await {
            Ok(()) => {
                debug!(event = %event, topic, "Push sent to topic");
                SendResult::ok()
            }
            Err(e) => {
                warn!(event = %event, topic, error = %e, "Failed to send push to topic");
                SendResult::failed(e.to_string())
            }
        }
    }
}

#[async_trait]
impl ChannelSender for PushSender {
    fn channel(&self) -> Channel {
        Channel::Push
    }

    async fn send(&self, event: EventType, destination: &str, data: &EventData) -> SendResult {
        match self.deliver(event, PushTarget::Device(destination.trim()), data).await {
            Ok(()) => {
                debug!(event = %event, "Push notification sent");
                SendResult::ok()
            }
            Err(e) => {
                warn!(event = %event, error = %e, "Failed to send push notification");
                SendResult::failed(e.to_string())
            }
        }
    }
}
