//! Check status and conclusion vocabularies.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a check.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChecksStatus {
    #[default]
    None,
    Queued,
    InProgress,
    Completed,
}

impl ChecksStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChecksStatus::None => "NONE",
            ChecksStatus::Queued => "QUEUED",
            ChecksStatus::InProgress => "IN_PROGRESS",
            ChecksStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for ChecksStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final outcome of a completed check.
///
/// `None` means no conclusion has been reached yet and is only meaningful
/// while the check is not completed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChecksConclusion {
    #[default]
    None,
    ActionRequired,
    Skipped,
    Canceled,
    #[serde(rename = "timeout", alias = "time_out", alias = "timed_out")]
    TimeOut,
    Failure,
    Neutral,
    Success,
}

impl ChecksConclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChecksConclusion::None => "NONE",
            ChecksConclusion::ActionRequired => "ACTION_REQUIRED",
            ChecksConclusion::Skipped => "SKIPPED",
            ChecksConclusion::Canceled => "CANCELED",
            ChecksConclusion::TimeOut => "TIME_OUT",
            ChecksConclusion::Failure => "FAILURE",
            ChecksConclusion::Neutral => "NEUTRAL",
            ChecksConclusion::Success => "SUCCESS",
        }
    }
}

impl fmt::Display for ChecksConclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
