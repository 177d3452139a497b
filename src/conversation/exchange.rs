//! Chat exchange records shown by the presentation layer.

use serde::Serialize;
use uuid::Uuid;

/// Who authored a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    User,
    System,
}

/// One immutable, append-only history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatExchange {
    /// `msg-<submission>` for questions, `bot-<submission>` for answers and
    /// `err-<submission>` for failure displays.
    pub id: String,
    /// Position in the controller's history, strictly increasing.
    pub sequence: u64,
    pub direction: Direction,
    pub text: String,
    pub is_error: bool,
}

impl ChatExchange {
    pub(crate) fn question(submission: Uuid, sequence: u64, text: impl Into<String>) -> Self {
        Self {
            id: format!("msg-{}", submission),
            sequence,
            direction: Direction::User,
            text: text.into(),
            is_error: false,
        }
    }

    pub(crate) fn answer(submission: Uuid, sequence: u64, text: impl Into<String>) -> Self {
        Self {
            id: format!("bot-{}", submission),
            sequence,
            direction: Direction::System,
            text: text.into(),
            is_error: false,
        }
    }

    pub(crate) fn failure(submission: Uuid, sequence: u64, text: impl Into<String>) -> Self {
        Self {
            id: format!("err-{}", submission),
            sequence,
            direction: Direction::System,
            text: text.into(),
            is_error: true,
        }
    }
}
