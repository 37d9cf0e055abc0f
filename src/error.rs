//! Error types for the poll-notify pipeline
//!
//! Errors are classified by where they stop the pipeline:
//! - Reported: transport, schema, parse and unknown-status failures. Caught at
//!   the loop boundary and relayed to the chat (deduped).
//! - Fatal: configuration errors. Raised before the loop starts.
//! - Logged only: notification send failures.

use thiserror::Error;

/// Failure of one fetch → validate → extract → parse pass.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("endpoint {endpoint} is unreachable: {details}")]
    Transport { endpoint: String, details: String },

    #[error("endpoint {endpoint} answered {status}: {body}")]
    HttpStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("unexpected API response: {0}")]
    Schema(String),

    #[error("cannot parse homework: {0}")]
    Parse(String),

    #[error("unknown homework status: {0}")]
    UnknownStatus(String),
}

/// Coarse classification used for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Schema,
    Parse,
    UnknownStatus,
}

impl PollError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PollError::Transport { .. } | PollError::HttpStatus { .. } => ErrorKind::Transport,
            PollError::Schema(_) => ErrorKind::Schema,
            PollError::Parse(_) => ErrorKind::Parse,
            PollError::UnknownStatus(_) => ErrorKind::UnknownStatus,
        }
    }

    /// Returns true if the next cycle may succeed without any change on our side
    pub fn is_transient(&self) -> bool {
        match self {
            PollError::Transport { .. } => true,
            PollError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Text relayed to the chat for this failure
    pub fn report(&self) -> String {
        format!("Program failure: {}", self)
    }
}

/// Startup configuration failure. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("invalid value for {key}: {details}")]
    Invalid { key: &'static str, details: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Notification send failure.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Telegram request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API error {status}: {description}")]
    Api { status: u16, description: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_prefixes_failure() {
        let err = PollError::UnknownStatus("pending".to_string());
        assert_eq!(
            err.report(),
            "Program failure: unknown homework status: pending"
        );
    }

    #[test]
    fn test_http_status_carries_diagnostics() {
        let err = PollError::HttpStatus {
            endpoint: "https://example.test/api/".to_string(),
            status: 503,
            body: "down".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("https://example.test/api/"));
        assert!(text.contains("503"));
        assert!(text.contains("down"));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_transient_classification() {
        let unavailable = PollError::HttpStatus {
            endpoint: String::new(),
            status: 503,
            body: String::new(),
        };
        let unauthorized = PollError::HttpStatus {
            endpoint: String::new(),
            status: 401,
            body: String::new(),
        };
        assert!(unavailable.is_transient());
        assert!(!unauthorized.is_transient());
        assert!(!PollError::Schema("x".into()).is_transient());
    }

    #[test]
    fn test_missing_config_lists_keys() {
        let err = ConfigError::Missing(vec!["PRACTICUM_TOKEN", "TELEGRAM_CHAT_ID"]);
        assert_eq!(
            err.to_string(),
            "missing required environment variables: PRACTICUM_TOKEN, TELEGRAM_CHAT_ID"
        );
    }
}
