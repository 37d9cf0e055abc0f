//! Homework status notifier.
//!
//! Polls the homework review API on a fixed period and relays status changes
//! (and pipeline failures) to a single Telegram chat.

pub mod config;
pub mod error;
pub mod logging;
pub mod poller;
pub mod practicum;
pub mod telegram;

#[cfg(test)]
mod test_support;

use config::BotConfig;
use error::ConfigError;
use poller::PollState;
use practicum::client::PracticumClient;
use telegram::TelegramNotifier;

/// Build the transports from `config` and poll forever.
///
/// Only returns if the HTTP clients cannot be constructed.
pub async fn run(config: &BotConfig) -> Result<(), ConfigError> {
    let source = PracticumClient::new(
        config.endpoint.clone(),
        &config.practicum_token,
        config.request_timeout(),
    )?;
    let notifier = TelegramNotifier::new(
        &config.telegram_api_url,
        &config.telegram_token,
        &config.chat_id,
        config.request_timeout(),
    )?;

    log::info!("Polling {}", source.endpoint());
    poller::run_homework_poller(
        &source,
        &notifier,
        config.retry_period(),
        PollState::starting_now(),
    )
    .await;

    Ok(())
}
