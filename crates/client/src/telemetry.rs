//! Injectable diagnostics for polling sessions.
//!
//! Each [`StatusPoller`](crate::poller::StatusPoller) receives its own
//! [`PollTelemetry`] instead of writing to process-wide debug state, so
//! sessions can be observed independently in tests.

use std::time::Duration;

use vidgen_core::status::JobStatus;

use crate::poller::{PollOutcome, PollTarget};

pub trait PollTelemetry: Send + Sync {
    fn session_started(&self, _target: &PollTarget, _interval: Duration) {}

    /// One status report was applied.
    fn status_observed(&self, _generation_id: &str, _status: JobStatus, _progress: u8) {}

    /// The provider reported a status outside the known vocabulary.
    fn unknown_status(&self, _generation_id: &str, _raw_status: &str) {}

    /// The reconciliation fetch after completion did not yield a video URL.
    fn reconciliation_failed(&self, _generation_id: &str, _reason: &str) {}

    fn session_finished(&self, _generation_id: &str, _outcome: &PollOutcome) {}
}

/// Emits structured [`tracing`] events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl PollTelemetry for TracingTelemetry {
    fn session_started(&self, target: &PollTarget, interval: Duration) {
        tracing::info!(
            generation_id = %target.generation_id,
            project_id = %target.project_id,
            interval_ms = interval.as_millis() as u64,
            "Polling generation status",
        );
    }

    fn status_observed(&self, generation_id: &str, status: JobStatus, progress: u8) {
        tracing::debug!(generation_id, status = %status, progress, "Generation status");
    }

    fn unknown_status(&self, generation_id: &str, raw_status: &str) {
        tracing::warn!(
            generation_id,
            raw_status,
            "Unknown generation status, treating as processing",
        );
    }

    fn reconciliation_failed(&self, generation_id: &str, reason: &str) {
        tracing::warn!(
            generation_id,
            reason,
            "Generation completed but the project video list did not confirm it",
        );
    }

    fn session_finished(&self, generation_id: &str, outcome: &PollOutcome) {
        match outcome {
            PollOutcome::Completed { video_url, warning } => tracing::info!(
                generation_id,
                video_url = video_url.as_deref().unwrap_or("<unknown>"),
                warning = warning.as_deref().unwrap_or(""),
                "Generation completed",
            ),
            PollOutcome::Failed { message } => {
                tracing::error!(generation_id, error = %message, "Generation failed")
            }
            PollOutcome::Cancelled => tracing::info!(generation_id, "Polling stopped"),
        }
    }
}
