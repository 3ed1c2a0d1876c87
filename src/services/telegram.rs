//! Telegram Bot API delivery

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineButton {
    pub text: String,
    pub url: String,
}

/// One channel post: text (or photo caption) plus an optional link button
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMessage {
    pub chat_id: String,
    pub text: String,
    pub parse_mode: ParseMode,
    pub photo_url: Option<String>,
    pub button: Option<InlineButton>,
}

impl OutgoingMessage {
    /// Same message without the photo attachment
    pub fn without_photo(&self) -> Self {
        Self {
            photo_url: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeliveryError {
    pub description: String,
}

impl DeliveryError {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "delivery failed: {}", self.description)
    }
}

impl std::error::Error for DeliveryError {}

impl From<reqwest::Error> for DeliveryError {
    fn from(e: reqwest::Error) -> Self {
        Self::new(e.to_string())
    }
}

/// Outbound channel for offers
#[async_trait]
pub trait OfferNotifier: Send + Sync {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), DeliveryError>;
}

#[derive(Serialize)]
struct InlineKeyboardMarkup<'a> {
    inline_keyboard: Vec<Vec<&'a InlineButton>>,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: ParseMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<InlineKeyboardMarkup<'a>>,
}

#[derive(Serialize)]
struct SendPhotoRequest<'a> {
    chat_id: &'a str,
    photo: &'a str,
    caption: &'a str,
    parse_mode: ParseMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<InlineKeyboardMarkup<'a>>,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    description: Option<String>,
}

#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    token: String,
    base_url: String,
}

impl TelegramNotifier {
    pub fn new(token: String) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Self::with_base_url(token, "https://api.telegram.org".to_string())
    }

    pub fn with_base_url(
        token: String,
        base_url: String,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            token,
            base_url,
        })
    }

    async fn call<T: Serialize + ?Sized>(&self, method: &str, body: &T) -> Result<(), DeliveryError> {
        let url = format!("{}/bot{}/{}", self.base_url, self.token, method);

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let payload: TelegramResponse = response.json().await.map_err(|e| {
            DeliveryError::new(format!("{} returned {} with unreadable body: {}", method, status, e))
        })?;

        if payload.ok {
            Ok(())
        } else {
            Err(DeliveryError::new(
                payload
                    .description
                    .unwrap_or_else(|| format!("{} returned {}", method, status)),
            ))
        }
    }
}

#[async_trait]
impl OfferNotifier for TelegramNotifier {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), DeliveryError> {
        let reply_markup = message.button.as_ref().map(|button| InlineKeyboardMarkup {
            inline_keyboard: vec![vec![button]],
        });

        match message.photo_url.as_deref() {
            Some(photo) => {
                let body = SendPhotoRequest {
                    chat_id: &message.chat_id,
                    photo,
                    caption: &message.text,
                    parse_mode: message.parse_mode,
                    reply_markup,
                };
                self.call("sendPhoto", &body).await
            }
            None => {
                let body = SendMessageRequest {
                    chat_id: &message.chat_id,
                    text: &message.text,
                    parse_mode: message.parse_mode,
                    reply_markup,
                };
                self.call("sendMessage", &body).await
            }
        }
    }
}
