//! Bot configuration loaded once at startup.
//!
//! Credentials come from the environment (optionally seeded from a `.env`
//! file). Endpoints and pacing have defaults and can be overridden the same way.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::error::ConfigError;

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

const HOMEWORK_ENDPOINT: &str = "HOMEWORK_ENDPOINT";
const TELEGRAM_API_URL: &str = "TELEGRAM_API_URL";
const RETRY_PERIOD_SECS: &str = "RETRY_PERIOD_SECS";
const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";

const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

fn default_retry_period_secs() -> u64 {
    600
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Everything the bot needs to run. Tokens are never serialized or printed.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    #[serde(skip_serializing)]
    pub practicum_token: String,
    #[serde(skip_serializing)]
    pub telegram_token: String,
    pub chat_id: String,
    pub endpoint: Url,
    pub telegram_api_url: Url,
    pub retry_period_secs: u64,
    pub request_timeout_secs: u64,
}

impl BotConfig {
    /// Build from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let practicum_token = get(PRACTICUM_TOKEN);
        let telegram_token = get(TELEGRAM_TOKEN);
        let chat_id = get(TELEGRAM_CHAT_ID);

        let missing: Vec<&'static str> = [
            (PRACTICUM_TOKEN, practicum_token.is_none()),
            (TELEGRAM_TOKEN, telegram_token.is_none()),
            (TELEGRAM_CHAT_ID, chat_id.is_none()),
        ]
        .into_iter()
        .filter_map(|(key, absent)| absent.then_some(key))
        .collect();

        let (Some(practicum_token), Some(telegram_token), Some(chat_id)) =
            (practicum_token, telegram_token, chat_id)
        else {
            return Err(ConfigError::Missing(missing));
        };

        let endpoint = parse_url(
            HOMEWORK_ENDPOINT,
            get(HOMEWORK_ENDPOINT).as_deref().unwrap_or(DEFAULT_ENDPOINT),
        )?;
        let telegram_api_url = parse_url(
            TELEGRAM_API_URL,
            get(TELEGRAM_API_URL)
                .as_deref()
                .unwrap_or(DEFAULT_TELEGRAM_API_URL),
        )?;

        let retry_period_secs = match get(RETRY_PERIOD_SECS) {
            Some(raw) => parse_secs(RETRY_PERIOD_SECS, &raw)?,
            None => default_retry_period_secs(),
        };
        let request_timeout_secs = match get(REQUEST_TIMEOUT_SECS) {
            Some(raw) => parse_secs(REQUEST_TIMEOUT_SECS, &raw)?,
            None => default_request_timeout_secs(),
        };

        Ok(Self {
            practicum_token,
            telegram_token,
            chat_id,
            endpoint,
            telegram_api_url,
            retry_period_secs,
            request_timeout_secs,
        })
    }

    pub fn retry_period(&self) -> Duration {
        Duration::from_secs(self.retry_period_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("practicum_token", &"***")
            .field("telegram_token", &"***")
            .field("chat_id", &self.chat_id)
            .field("endpoint", &self.endpoint.as_str())
            .field("telegram_api_url", &self.telegram_api_url.as_str())
            .field("retry_period_secs", &self.retry_period_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

fn parse_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::Invalid {
        key,
        details: format!("{}: {}", raw, e),
    })
}

fn parse_secs(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            key,
            details: "must be greater than zero".to_string(),
        }),
        Ok(secs) => Ok(secs),
        Err(e) => Err(ConfigError::Invalid {
            key,
            details: format!("{}: {}", raw, e),
        }),
    }
}
