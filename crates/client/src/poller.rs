//! Generation status polling.
//!
//! [`StatusPoller::start_polling`] spawns one session per job. A session
//! queries the job status immediately and then on a fixed interval,
//! folds each report into a [`GenerationJob`], forwards progress and
//! status changes to its [`GenerationObserver`], and ends on the first
//! terminal status or query error. After `completed` it re-fetches the
//! project's video list to recover the final video URL.
//!
//! Ticks never overlap: each status request and its handling finish
//! before the next tick is awaited. Stopping a session cancels its
//! token; the observer is never called after that.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use vidgen_core::generation::{GenerationJob, GENERIC_FAILURE_MESSAGE, RECONCILIATION_WARNING};
use vidgen_core::status::JobStatus;

use crate::backend::VideoBackend;
use crate::observer::GenerationObserver;
use crate::schemas::find_video_url;
use crate::telemetry::{PollTelemetry, TracingTelemetry};

/// Floor applied to the requested interval (a zero period is invalid).
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// The job a session follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollTarget {
    pub generation_id: String,
    /// Project whose video list is used to reconcile the final URL.
    pub project_id: String,
}

impl PollTarget {
    pub fn new(generation_id: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            generation_id: generation_id.into(),
            project_id: project_id.into(),
        }
    }
}

/// How a polling session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The job completed. `warning` is set when the video list refresh
    /// could not confirm the result; `video_url` may then be unknown.
    Completed {
        video_url: Option<String>,
        warning: Option<String>,
    },
    /// The job failed, or a status query failed.
    Failed { message: String },
    /// The session was stopped before reaching a terminal state.
    Cancelled,
}

impl PollOutcome {
    pub fn video_url(&self) -> Option<&str> {
        match self {
            Self::Completed { video_url, .. } => video_url.as_deref(),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

// ---------------------------------------------------------------------------
// StatusPoller
// ---------------------------------------------------------------------------

/// Starts polling sessions against a [`VideoBackend`].
///
/// Cheap to clone; holds no session state itself.
#[derive(Clone)]
pub struct StatusPoller {
    backend: Arc<dyn VideoBackend>,
    telemetry: Arc<dyn PollTelemetry>,
}

impl StatusPoller {
    /// Create a poller that reports diagnostics through `tracing`.
    pub fn new(backend: Arc<dyn VideoBackend>) -> Self {
        Self::with_telemetry(backend, Arc::new(TracingTelemetry))
    }

    pub fn with_telemetry(
        backend: Arc<dyn VideoBackend>,
        telemetry: Arc<dyn PollTelemetry>,
    ) -> Self {
        Self { backend, telemetry }
    }

    /// Spawn a session that polls `target` every `interval`.
    ///
    /// The first status query is issued immediately. Must be called from
    /// within a Tokio runtime.
    pub fn start_polling(
        &self,
        target: PollTarget,
        interval: Duration,
        observer: Arc<dyn GenerationObserver>,
    ) -> PollingHandle {
        let interval = interval.max(MIN_POLL_INTERVAL);
        let cancel = CancellationToken::new();
        let (latest_tx, latest_rx) =
            watch::channel(GenerationJob::new(target.generation_id.clone()));

        self.telemetry.session_started(&target, interval);

        let session = Session {
            backend: Arc::clone(&self.backend),
            telemetry: Arc::clone(&self.telemetry),
            observer: GuardedObserver {
                inner: observer,
                cancel: cancel.clone(),
            },
            target: target.clone(),
            interval,
            cancel: cancel.clone(),
            latest: latest_tx,
        };

        let task = tokio::spawn(session.run());

        PollingHandle {
            generation_id: target.generation_id,
            cancel,
            latest: latest_rx,
            task,
        }
    }
}

// ---------------------------------------------------------------------------
// PollingHandle / SessionStopper
// ---------------------------------------------------------------------------

/// Owner's handle on one running session.
///
/// Dropping the handle does not stop the session; call [`stop`](Self::stop)
/// on teardown, or use a [`GenerationPoller`] which does so on drop.
pub struct PollingHandle {
    generation_id: String,
    cancel: CancellationToken,
    latest: watch::Receiver<GenerationJob>,
    task: JoinHandle<PollOutcome>,
}

impl PollingHandle {
    pub fn generation_id(&self) -> &str {
        &self.generation_id
    }

    /// Stop the session. Idempotent, and safe to call from inside an
    /// observer callback.
    ///
    /// No callback starts after this returns. Callbacks run on the
    /// session's task, so on a multi-threaded runtime one that began
    /// before the call may still be running on another worker when it
    /// returns. Use [`stop_and_wait`](Self::stop_and_wait) to wait for it.
    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            tracing::debug!(generation_id = %self.generation_id, "Stopping generation polling");
        }
        self.cancel.cancel();
    }

    /// A cloneable stop switch for this session.
    pub fn stopper(&self) -> SessionStopper {
        SessionStopper {
            cancel: self.cancel.clone(),
        }
    }

    /// `false` once the session was stopped or reached a terminal state.
    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Last observed state of the job.
    pub fn latest(&self) -> GenerationJob {
        self.latest.borrow().clone()
    }

    /// Stop the session and wait for its task to end.
    ///
    /// Once this returns no callback is running. Must not be awaited
    /// from inside a callback of the same session.
    pub async fn stop_and_wait(self) -> PollOutcome {
        self.stop();
        self.wait().await
    }

    /// Wait for the session to end.
    pub async fn wait(self) -> PollOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    generation_id = %self.generation_id,
                    error = %e,
                    "Polling task ended abnormally",
                );
                PollOutcome::Failed {
                    message: format!("Polling ended unexpectedly: {e}"),
                }
            }
        }
    }
}

/// Stops one session; may be handed to observers or other tasks.
#[derive(Debug, Clone)]
pub struct SessionStopper {
    cancel: CancellationToken,
}

impl SessionStopper {
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

// ---------------------------------------------------------------------------
// GenerationPoller
// ---------------------------------------------------------------------------

/// Holds at most one session for a single UI context.
///
/// Starting a new session stops the previous one first, so two timers
/// never write to the same result slot. Dropping the poller stops its
/// session.
pub struct GenerationPoller {
    poller: StatusPoller,
    current: Option<PollingHandle>,
}

impl GenerationPoller {
    pub fn new(poller: StatusPoller) -> Self {
        Self {
            poller,
            current: None,
        }
    }

    pub fn start_polling(
        &mut self,
        target: PollTarget,
        interval: Duration,
        observer: Arc<dyn GenerationObserver>,
    ) -> &PollingHandle {
        self.stop();
        self.current
            .insert(self.poller.start_polling(target, interval, observer))
    }

    pub fn stop(&self) {
        if let Some(handle) = &self.current {
            handle.stop();
        }
    }

    pub fn current(&self) -> Option<&PollingHandle> {
        self.current.as_ref()
    }

    /// Detach the current session, e.g. to [`wait`](PollingHandle::wait) on it.
    pub fn take(&mut self) -> Option<PollingHandle> {
        self.current.take()
    }
}

impl Drop for GenerationPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// Session internals
// ---------------------------------------------------------------------------

/// Drops every callback once the session's token is cancelled.
struct GuardedObserver {
    inner: Arc<dyn GenerationObserver>,
    cancel: CancellationToken,
}

impl GuardedObserver {
    fn live(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    fn progress(&self, percent: u8) {
        if self.live() {
            self.inner.on_progress(percent);
        }
    }

    fn status_change(&self, status: JobStatus) {
        if self.live() {
            self.inner.on_status_change(status);
        }
    }

    fn success(&self, video_url: &str) {
        if self.live() {
            self.inner.on_success(video_url);
        }
    }

    fn warning(&self, message: &str) {
        if self.live() {
            self.inner.on_warning(message);
        }
    }

    fn error(&self, message: &str) {
        if self.live() {
            self.inner.on_error(message);
        }
    }
}

struct Session {
    backend: Arc<dyn VideoBackend>,
    telemetry: Arc<dyn PollTelemetry>,
    observer: GuardedObserver,
    target: PollTarget,
    interval: Duration,
    cancel: CancellationToken,
    latest: watch::Sender<GenerationJob>,
}

impl Session {
    async fn run(self) -> PollOutcome {
        let outcome = self.poll_until_terminal().await;
        self.telemetry
            .session_finished(&self.target.generation_id, &outcome);
        // Mark the session inactive; a later stop() is then a no-op.
        self.cancel.cancel();
        outcome
    }

    async fn poll_until_terminal(&self) -> PollOutcome {
        let generation_id = self.target.generation_id.as_str();
        let mut job = GenerationJob::new(generation_id);
        let mut first_report = true;

        // The first tick completes immediately.
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return PollOutcome::Cancelled,
                _ = ticker.tick() => {}
            }

            let response = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return PollOutcome::Cancelled,
                response = self.backend.generation_status(generation_id) => response,
            };

            let report = match response {
                Ok(report) => report,
                Err(e) => {
                    // Transport and decode errors end the session; the
                    // caller decides whether to resubmit.
                    let message = e.to_string();
                    self.observer.error(&message);
                    return PollOutcome::Failed { message };
                }
            };

            let status = JobStatus::from_external(&report.status).unwrap_or_else(|| {
                self.telemetry.unknown_status(generation_id, &report.status);
                JobStatus::Processing
            });

            let update = job.apply_report(
                status,
                report.progress,
                report.video_url,
                report.error,
                first_report,
            );
            first_report = false;
            self.latest.send_replace(job.clone());
            self.telemetry
                .status_observed(generation_id, status, job.progress);

            if update.status_changed {
                self.observer.status_change(status);
            }
            if let Some(percent) = update.progress {
                self.observer.progress(percent);
            }

            match status {
                JobStatus::Completed => return self.reconcile(job).await,
                JobStatus::Failed => {
                    let message = job
                        .error_message
                        .clone()
                        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
                    self.observer.error(&message);
                    return PollOutcome::Failed { message };
                }
                _ => {}
            }
        }
    }

    /// Recover the final video URL from the project's video list.
    ///
    /// The job has already completed, so a failed or inconclusive fetch
    /// downgrades to a warning instead of an error.
    async fn reconcile(&self, mut job: GenerationJob) -> PollOutcome {
        let generation_id = self.target.generation_id.as_str();

        let fetched = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return PollOutcome::Cancelled,
            fetched = self.backend.project_videos(&self.target.project_id) => fetched,
        };

        let reconciled = match fetched {
            Ok(videos) => find_video_url(&videos, generation_id).ok_or_else(|| {
                format!(
                    "no video for this generation in project {}",
                    self.target.project_id
                )
            }),
            Err(e) => Err(e.to_string()),
        };

        match reconciled {
            Ok(video_url) => {
                job.video_url = Some(video_url.clone());
                self.latest.send_replace(job);
                self.observer.success(&video_url);
                PollOutcome::Completed {
                    video_url: Some(video_url),
                    warning: None,
                }
            }
            Err(reason) => {
                self.telemetry.reconciliation_failed(generation_id, &reason);
                let video_url = job.video_url.clone();
                if let Some(url) = &video_url {
                    self.observer.success(url);
                }
                self.observer.warning(RECONCILIATION_WARNING);
                PollOutcome::Completed {
                    video_url,
                    warning: Some(RECONCILIATION_WARNING.to_string()),
                }
            }
        }
    }
}
