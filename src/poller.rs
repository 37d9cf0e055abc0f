//! Background homework status poller.
//!
//! Runs as a long-lived async task: fetch the latest statuses, turn the most
//! recent submission into a message, relay it to the chat if it changed, then
//! sleep a fixed period. Failures are relayed the same way, deduped against
//! the last reported failure, and never stop the loop.

use std::time::Duration;

use chrono::Utc;

use crate::error::PollError;
use crate::practicum::check::{check_response, latest_homework, parse_status};
use crate::practicum::StatusSource;
use crate::telegram::Notifier;

/// Whether the last completed cycle succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    Normal,
    Degraded,
}

/// In-memory state carried from one cycle to the next.
#[derive(Debug, Clone)]
pub struct PollState {
    last_status_message: String,
    last_error_message: String,
    since: i64,
    health: Health,
}

impl PollState {
    pub fn new(since: i64) -> Self {
        Self {
            last_status_message: String::new(),
            last_error_message: String::new(),
            since,
            health: Health::Normal,
        }
    }

    /// State for a fresh process: ask for changes from now on.
    pub fn starting_now() -> Self {
        Self::new(Utc::now().timestamp())
    }

    pub fn since(&self) -> i64 {
        self.since
    }

    pub fn health(&self) -> Health {
        self.health
    }

    pub fn last_status_message(&self) -> &str {
        &self.last_status_message
    }

    pub fn last_error_message(&self) -> &str {
        &self.last_error_message
    }

    fn advance(&mut self, current_date: Option<i64>) {
        if let Some(current_date) = current_date {
            self.since = current_date;
        }
    }

    fn set_health(&mut self, health: Health) {
        if self.health != health {
            log::info!("Homework poller: {:?} -> {:?}", self.health, health);
            self.health = health;
        }
    }
}

/// What a single cycle ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new status message was delivered.
    Notified(String),
    /// The status message matched the last one sent.
    Unchanged,
    /// The listing was empty; nothing to report.
    NoHomeworks,
    /// The pipeline failed. `reported` is false when the failure was a repeat
    /// or the chat could not be reached.
    Failed { error: String, reported: bool },
}

/// Result of one fetch → validate → parse pass.
///
/// `current_date` is the server clock from a validated answer. It is not
/// applied to the state here; the caller decides once delivery is settled.
#[derive(Debug)]
pub struct Checked {
    pub current_date: Option<i64>,
    pub status: Result<Option<String>, PollError>,
}

/// Fetch, validate and parse. `status` holds the message for the most recent
/// submission, or `None` when the listing is empty.
pub async fn check_homework<S>(source: &S, since: i64) -> Checked
where
    S: StatusSource + ?Sized,
{
    let response = match source.fetch(since).await.and_then(check_response) {
        Ok(response) => response,
        Err(e) => {
            return Checked {
                current_date: None,
                status: Err(e),
            }
        }
    };

    let status = match latest_homework(&response) {
        Some(homework) => parse_status(homework).map(|hw| Some(hw.status_message())),
        None => {
            log::debug!("No homeworks since {}", since);
            Ok(None)
        }
    };

    Checked {
        current_date: response.current_date,
        status,
    }
}

/// One full pass of the poll-notify loop, without the sleep.
///
/// `since` only moves forward when the answer needs no redelivery: a status
/// that failed to send is fetched again with the old `from_date`.
pub async fn run_cycle<S, N>(source: &S, notifier: &N, state: &mut PollState) -> CycleOutcome
where
    S: StatusSource + ?Sized,
    N: Notifier + ?Sized,
{
    let Checked {
        current_date,
        status,
    } = check_homework(source, state.since).await;

    match status {
        Ok(Some(message)) => {
            state.set_health(Health::Normal);
            if message == state.last_status_message {
                log::debug!("Homework status unchanged");
                state.advance(current_date);
                return CycleOutcome::Unchanged;
            }
            if deliver(notifier, &message).await {
                state.last_status_message = message.clone();
                state.advance(current_date);
                CycleOutcome::Notified(message)
            } else {
                CycleOutcome::Failed {
                    error: "status notification not delivered".to_string(),
                    reported: false,
                }
            }
        }
        Ok(None) => {
            state.set_health(Health::Normal);
            state.advance(current_date);
            CycleOutcome::NoHomeworks
        }
        Err(e) => {
            state.set_health(Health::Degraded);
            state.advance(current_date);
            if e.is_transient() {
                log::warn!("Homework poller: {} ({:?})", e, e.kind());
            } else {
                log::error!("Homework poller: {} ({:?})", e, e.kind());
            }

            let report = e.report();
            if report == state.last_error_message {
                return CycleOutcome::Failed {
                    error: report,
                    reported: false,
                };
            }
            let reported = deliver(notifier, &report).await;
            if reported {
                state.last_error_message = report.clone();
            }
            CycleOutcome::Failed {
                error: report,
                reported,
            }
        }
    }
}

/// Send failures are logged and swallowed; the caller keeps its dedup buffer
/// untouched so the message is retried next cycle.
async fn deliver<N>(notifier: &N, text: &str) -> bool
where
    N: Notifier + ?Sized,
{
    match notifier.send_message(text).await {
        Ok(()) => true,
        Err(e) => {
            log::error!("Failed to send message: {}", e);
            false
        }
    }
}

/// Poll forever, sleeping `period` after every cycle.
pub async fn run_homework_poller<S, N>(source: &S, notifier: &N, period: Duration, mut state: PollState)
where
    S: StatusSource + ?Sized,
    N: Notifier + ?Sized,
{
    log::info!(
        "Homework poller: starting, period {:?}, from_date {}",
        period,
        state.since
    );

    loop {
        match run_cycle(source, notifier, &mut state).await {
            CycleOutcome::Notified(message) => {
                log::info!("Homework poller: notified \"{}\"", message)
            }
            CycleOutcome::Failed { reported: true, .. } => {
                log::info!("Homework poller: failure reported to chat")
            }
            outcome => log::debug!("Homework poller: {:?}", outcome),
        }

        tokio::time::sleep(period).await;
    }
}
