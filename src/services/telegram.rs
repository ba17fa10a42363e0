// src/services/telegram.rs

//! Telegram Bot API client.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::error::{AppError, Result};

/// Delivery seam for the publisher.
///
/// The pipeline talks to this trait so publishing can be exercised in
/// tests without the network.
#[async_trait]
pub trait PhotoSender: Send + Sync {
    /// One-time session setup before a batch: clears any stale pending
    /// inbound state so the bot starts from a clean slate.
    async fn prepare(&self) -> Result<()>;

    /// Send a photo with an HTML caption to the target chat, optionally
    /// into a forum topic.
    async fn send_photo(
        &self,
        topic_id: Option<i64>,
        photo_url: &str,
        caption: &str,
    ) -> Result<()>;
}

/// HTTP client for the Telegram Bot API.
pub struct TelegramClient {
    client: Client,
    bot_token: String,
    chat_id: i64,
}

impl TelegramClient {
    /// Create a new Telegram client for one target chat.
    pub fn new(client: Client, bot_token: impl Into<String>, chat_id: i64) -> Self {
        Self {
            client,
            bot_token: bot_token.into(),
            chat_id,
        }
    }

    async fn call(&self, method: &str, body: serde_json::Value) -> Result<()> {
        let url = format!("https://api.telegram.org/bot{}/{}", self.bot_token, method);

        let resp = self.client.post(&url).json(&body).send().await?;

        if !resp.status().is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            return Err(AppError::Telegram(format!("{method}: {error_text}")));
        }

        Ok(())
    }
}

#[async_trait]
impl PhotoSender for TelegramClient {
    async fn prepare(&self) -> Result<()> {
        self.call("deleteWebhook", json!({ "drop_pending_updates": true }))
            .await
    }

    async fn send_photo(
        &self,
        topic_id: Option<i64>,
        photo_url: &str,
        caption: &str,
    ) -> Result<()> {
        let mut body = json!({
            "chat_id": self.chat_id,
            "photo": photo_url,
            "caption": caption,
            "parse_mode": "HTML",
        });
        if let Some(topic) = topic_id {
            body["message_thread_id"] = json!(topic);
        }

        self.call("sendPhoto", body).await
    }
}
