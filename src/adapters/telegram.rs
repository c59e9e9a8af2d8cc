use crate::domain::model::SentMessage;
use crate::domain::ports::Messenger;
use crate::utils::error::{NotifierError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Delivery collaborator over the Telegram Bot API.
///
/// HTML parse mode is used throughout; MarkdownV2 would require escaping
/// reserved characters in every address and URL.
pub struct TelegramMessenger {
    client: Client,
    token: String,
    base_url: String,
}

impl TelegramMessenger {
    pub fn new(token: String) -> Self {
        Self {
            client: Client::new(),
            token,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send(
        &self,
        channel: &str,
        text: &str,
        reply_to: Option<i64>,
    ) -> Result<SentMessage> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);

        let mut params: Vec<(&str, String)> = vec![
            ("chat_id", channel.to_string()),
            ("parse_mode", "HTML".to_string()),
            ("text", text.to_string()),
        ];
        if let Some(message_id) = reply_to {
            params.push(("reply_to_message_id", message_id.to_string()));
        }

        let response = self
            .client
            .post(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| NotifierError::DeliveryError {
                message: format!("sendMessage request failed: {}", e),
            })?;

        let body: TelegramResponse =
            response
                .json()
                .await
                .map_err(|e| NotifierError::DeliveryError {
                    message: format!("Unreadable sendMessage response: {}", e),
                })?;

        match body {
            TelegramResponse {
                ok: true,
                result: Some(message),
                ..
            } => Ok(SentMessage {
                message_id: message.message_id,
                text: message.text.unwrap_or_else(|| text.to_string()),
            }),
            TelegramResponse { description, .. } => Err(NotifierError::DeliveryError {
                message: description.unwrap_or_else(|| "sendMessage was not ok".to_string()),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    result: Option<TelegramMessage>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TelegramMessage {
    message_id: i64,
    #[serde(default)]
    text: Option<String>,
}
