//! HTTP client for the homework status endpoint.
//!
//! Uses reqwest with `OAuth` token auth. One GET per poll cycle with a
//! `from_date` query parameter.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::StatusSource;
use crate::error::{ConfigError, PollError};

pub struct PracticumClient {
    client: reqwest::Client,
    endpoint: Url,
    token: String,
}

impl PracticumClient {
    pub fn new(endpoint: Url, token: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            token: token.to_string(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch statuses changed since `from_date` (unix seconds).
    pub async fn get_api_answer(&self, from_date: i64) -> Result<serde_json::Value, PollError> {
        log::debug!(
            "Requesting {} with from_date={}",
            self.endpoint,
            from_date
        );

        let resp = self
            .client
            .get(self.endpoint.clone())
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| PollError::Transport {
                endpoint: self.endpoint.to_string(),
                details: e.to_string(),
            })?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            let url = resp.url().to_string();
            let body = resp.text().await.unwrap_or_default();
            return Err(PollError::HttpStatus {
                endpoint: url,
                status: status.as_u16(),
                body: truncate(&body, 500),
            });
        }

        resp.json::<serde_json::Value>()
            .await
            .map_err(|e| PollError::Schema(format!("response is not valid JSON: {}", e)))
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<serde_json::Value, PollError> {
        self.get_api_answer(from_date).await
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
