//! Homework review API integration.
//!
//! `client` fetches raw status payloads over HTTP, `check` turns them into a
//! notification message. The shapes below are what a well-formed payload holds.

pub mod check;
pub mod client;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::error::PollError;

/// Review verdict for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub const ALL: [HomeworkStatus; 3] = [
        HomeworkStatus::Approved,
        HomeworkStatus::Reviewing,
        HomeworkStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// Human-readable verdict sent to the chat
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Work reviewed: everything looks good. Hooray!",
            HomeworkStatus::Reviewing => "Work taken for review by the reviewer.",
            HomeworkStatus::Rejected => "Work reviewed: the reviewer has comments.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = PollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HomeworkStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| PollError::UnknownStatus(s.to_string()))
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single submission, most recent first in the API listing.
///
/// Built by `check::parse_status` rather than serde so that a missing field
/// and an unrecognised status surface as different errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Homework {
    pub name: String,
    pub status: HomeworkStatus,
}

impl Homework {
    /// Notification text for this submission's current status.
    pub fn status_message(&self) -> String {
        format!(
            "Changed review status of \"{}\". {}",
            self.name,
            self.status.verdict()
        )
    }
}

/// Validated API answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub homeworks: Vec<serde_json::Value>,
    pub current_date: Option<i64>,
}

/// Anything that can answer "what changed since `from_date`".
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self, from_date: i64) -> Result<serde_json::Value, PollError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in HomeworkStatus::ALL {
            assert_eq!(status.as_str().parse::<HomeworkStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_status() {
        let err = "pending".parse::<HomeworkStatus>().unwrap_err();
        assert!(matches!(err, PollError::UnknownStatus(ref s) if s == "pending"));
    }

    #[test]
    fn test_status_message_format() {
        let hw = Homework {
            name: "hw1".to_string(),
            status: HomeworkStatus::Approved,
        };
        assert_eq!(
            hw.status_message(),
            "Changed review status of \"hw1\". Work reviewed: everything looks good. Hooray!"
        );
    }
}
