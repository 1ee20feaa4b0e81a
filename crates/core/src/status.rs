//! Job status vocabulary and external-status normalization.
//!
//! The provider reports job state as free-form strings whose spelling
//! and casing drift between endpoints (`accepted`, `REJECTED`,
//! `in_progress`, ...). All knowledge of that vocabulary lives in
//! [`JobStatus::from_external`]; the rest of the workspace only sees the
//! closed [`JobStatus`] enum.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Internal state machine for one generation job.
///
/// `Queued -> Preparing -> Generating -> Processing -> Completed`, with
/// `Failed` reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Preparing,
    Generating,
    Processing,
    Completed,
    Failed,
}

/// All statuses in lifecycle order.
pub const ALL_STATUSES: &[JobStatus] = &[
    JobStatus::Queued,
    JobStatus::Preparing,
    JobStatus::Generating,
    JobStatus::Processing,
    JobStatus::Completed,
    JobStatus::Failed,
];

impl JobStatus {
    /// Map a provider status string onto the internal state machine.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Returns `None` for vocabulary we do not recognise; callers decide
    /// how loudly to complain (see [`normalize_status`]).
    pub fn from_external(raw: &str) -> Option<Self> {
        let status = match raw.trim().to_ascii_lowercase().as_str() {
            "queued" | "accepted" | "pending" | "submitted" => Self::Queued,
            "preparing" => Self::Preparing,
            "generating" | "running" | "in_progress" => Self::Generating,
            "processing" => Self::Processing,
            "completed" | "complete" | "succeeded" | "success" | "done" => Self::Completed,
            "failed" | "rejected" | "error" | "cancelled" | "canceled" => Self::Failed,
            _ => return None,
        };
        Some(status)
    }

    /// Canonical lower-case name, as emitted to observers and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Preparing => "preparing",
            Self::Generating => "generating",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// `Completed` and `Failed` end a polling session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a provider status string, mapping unknown values to
/// [`JobStatus::Processing`].
///
/// An unknown status is not terminal, so the job keeps being polled
/// until the provider reports something we understand.
pub fn normalize_status(raw: &str) -> JobStatus {
    JobStatus::from_external(raw).unwrap_or(JobStatus::Processing)
}
