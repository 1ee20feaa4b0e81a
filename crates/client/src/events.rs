//! Lifecycle events emitted for one generation job.
//!
//! These are the channel-friendly form of the
//! [`GenerationObserver`](crate::observer::GenerationObserver) callbacks,
//! produced by [`ChannelObserver`](crate::observer::ChannelObserver).

use chrono::{DateTime, Utc};
use vidgen_core::job_events::{
    MSG_TYPE_GENERATION_COMPLETED, MSG_TYPE_GENERATION_FAILED, MSG_TYPE_GENERATION_PROGRESS,
    MSG_TYPE_GENERATION_STATUS, MSG_TYPE_GENERATION_WARNING,
};
use vidgen_core::status::JobStatus;

/// A lifecycle event for one generation job.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationEvent {
    pub generation_id: String,
    pub kind: GenerationEventKind,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationEventKind {
    /// Completion percentage (0-100).
    Progress { percent: u8 },

    /// The normalized status changed.
    StatusChanged { status: JobStatus },

    /// The job completed and its video URL is known.
    Completed { video_url: String },

    /// Something non-fatal went wrong; the job itself is unaffected.
    Warning { message: String },

    /// The job failed or polling could not continue.
    Failed { message: String },
}

impl GenerationEvent {
    pub fn new(generation_id: impl Into<String>, kind: GenerationEventKind) -> Self {
        Self {
            generation_id: generation_id.into(),
            kind,
            timestamp: Utc::now(),
        }
    }

    /// Message type name used when serializing the event.
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            GenerationEventKind::Progress { .. } => MSG_TYPE_GENERATION_PROGRESS,
            GenerationEventKind::StatusChanged { .. } => MSG_TYPE_GENERATION_STATUS,
            GenerationEventKind::Completed { .. } => MSG_TYPE_GENERATION_COMPLETED,
            GenerationEventKind::Warning { .. } => MSG_TYPE_GENERATION_WARNING,
            GenerationEventKind::Failed { .. } => MSG_TYPE_GENERATION_FAILED,
        }
    }

    /// Flat JSON representation, tagged by `type`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "type": self.type_name(),
            "generation_id": self.generation_id,
            "timestamp": self.timestamp.to_rfc3339(),
        });

        let extra = match &self.kind {
            GenerationEventKind::Progress { percent } => ("percent", serde_json::json!(percent)),
            GenerationEventKind::StatusChanged { status } => {
                ("status", serde_json::json!(status.as_str()))
            }
            GenerationEventKind::Completed { video_url } => {
                ("video_url", serde_json::json!(video_url))
            }
            GenerationEventKind::Warning { message } | GenerationEventKind::Failed { message } => {
                ("message", serde_json::json!(message))
            }
        };
        payload[extra.0] = extra.1;
        payload
    }
}
