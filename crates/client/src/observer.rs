//! Callback surface through which a polling session hands control back
//! to presentation code.

use tokio::sync::mpsc;
use vidgen_core::status::JobStatus;

use crate::events::{GenerationEvent, GenerationEventKind};

/// Receives lifecycle callbacks for one polling session.
///
/// All methods default to no-ops so observers implement only what they
/// display. Callbacks run on the session's task and must not block;
/// they may call [`PollingHandle::stop`](crate::poller::PollingHandle::stop)
/// (or a [`SessionStopper`](crate::poller::SessionStopper)), after which
/// no further callback is delivered.
pub trait GenerationObserver: Send + Sync {
    /// Completion percentage, non-decreasing within a session.
    fn on_progress(&self, _percent: u8) {}

    /// The normalized status changed (the first report always counts).
    fn on_status_change(&self, _status: JobStatus) {}

    /// The job completed with this video URL. Called at most once.
    fn on_success(&self, _video_url: &str) {}

    /// Non-fatal problem, e.g. the video list refresh after completion failed.
    fn on_warning(&self, _message: &str) {}

    /// The job failed or polling hit an unrecoverable error. Called at most once.
    fn on_error(&self, _message: &str) {}
}

/// Forwards callbacks as [`GenerationEvent`]s over an unbounded channel.
///
/// Events are dropped silently once the receiver is gone.
pub struct ChannelObserver {
    generation_id: String,
    tx: mpsc::UnboundedSender<GenerationEvent>,
}

impl ChannelObserver {
    /// Create an observer and the receiving end of its event stream.
    pub fn new(
        generation_id: impl Into<String>,
    ) -> (Self, mpsc::UnboundedReceiver<GenerationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let observer = Self {
            generation_id: generation_id.into(),
            tx,
        };
        (observer, rx)
    }

    fn emit(&self, kind: GenerationEventKind) {
        // A closed receiver only means nobody is listening any more.
        let _ = self
            .tx
            .send(GenerationEvent::new(self.generation_id.clone(), kind));
    }
}

impl GenerationObserver for ChannelObserver {
    fn on_progress(&self, percent: u8) {
        self.emit(GenerationEventKind::Progress { percent });
    }

    fn on_status_change(&self, status: JobStatus) {
        self.emit(GenerationEventKind::StatusChanged { status });
    }

    fn on_success(&self, video_url: &str) {
        self.emit(GenerationEventKind::Completed {
            video_url: video_url.to_string(),
        });
    }

    fn on_warning(&self, message: &str) {
        self.emit(GenerationEventKind::Warning {
            message: message.to_string(),
        });
    }

    fn on_error(&self, message: &str) {
        self.emit(GenerationEventKind::Failed {
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channel_observer_forwards_callbacks_in_order() {
        let (observer, mut rx) = ChannelObserver::new("gen-1");

        observer.on_status_change(JobStatus::Queued);
        observer.on_progress(10);
        observer.on_success("https://cdn/v.mp4");
        drop(observer);

        let mut kinds = Vec::new();
        while let Some(event) = rx.recv().await {
            assert_eq!(event.generation_id, "gen-1");
            kinds.push(event.kind);
        }

        assert_eq!(
            kinds,
            vec![
                GenerationEventKind::StatusChanged {
                    status: JobStatus::Queued
                },
                GenerationEventKind::Progress { percent: 10 },
                GenerationEventKind::Completed {
                    video_url: "https://cdn/v.mp4".into()
                },
            ]
        );
    }

    #[test]
    fn closed_receiver_does_not_panic() {
        let (observer, rx) = ChannelObserver::new("gen-1");
        drop(rx);
        observer.on_error("gone");
    }
}
