//! Telegram notification wrapper
//!
//! Provides a simple interface to send a chat message via the Bot API
//! `sendMessage` method.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::error::{ConfigError, NotifyError};

/// Delivery channel for notification text.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<(), NotifyError>;
}

#[derive(Debug, Deserialize)]
struct BotApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramNotifier {
    client: reqwest::Client,
    send_url: Url,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        api_url: &Url,
        token: &str,
        chat_id: &str,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let send_url = api_url
            .join(&format!("./bot{}/sendMessage", token))
            .map_err(|e| ConfigError::Invalid {
                key: crate::config::TELEGRAM_TOKEN,
                details: e.to_string(),
            })?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            send_url,
            chat_id: chat_id.to_string(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_message(&self, text: &str) -> Result<(), NotifyError> {
        let body = serde_json::json!({ "chat_id": self.chat_id, "text": text });
        let resp = self
            .client
            .post(self.send_url.clone())
            .json(&body)
            .send()
            .await
            // The request URL embeds the bot token.
            .map_err(|e| NotifyError::Http(e.without_url()))?;

        let status = resp.status();
        let reply = resp.json::<BotApiReply>().await.ok();

        match reply {
            Some(BotApiReply { ok: true, .. }) if status.is_success() => {
                log::debug!("Message sent: \"{}\"", text);
                Ok(())
            }
            reply => Err(NotifyError::Api {
                status: status.as_u16(),
                description: reply
                    .and_then(|r| r.description)
                    .unwrap_or_else(|| "no description".to_string()),
            }),
        }
    }
}
