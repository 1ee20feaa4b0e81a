//! One submit-and-poll run, writing lifecycle events as JSON lines.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use vidgen_client::backend::VideoBackend;
use vidgen_client::observer::ChannelObserver;
use vidgen_client::poller::{PollOutcome, StatusPoller};
use vidgen_client::submitter::{GenerationSubmitter, Submission};
use vidgen_core::generation::GenerationRequest;
use vidgen_core::job_events::MSG_TYPE_GENERATION_SUBMITTED;

/// Exit status when the run was interrupted (128 + SIGINT).
const EXIT_INTERRUPTED: u8 = 130;

/// Submit `request`, poll it every `interval` and write one JSON line per
/// lifecycle event to `out`.
///
/// Submission failures are returned as errors. Once a job exists the
/// result is a [`PollOutcome`]; `shutdown` resolving stops polling and
/// yields [`PollOutcome::Cancelled`].
pub async fn run_generation<W, S>(
    backend: Arc<dyn VideoBackend>,
    request: &GenerationRequest,
    interval: Duration,
    out: &mut W,
    shutdown: S,
) -> anyhow::Result<PollOutcome>
where
    W: Write,
    S: Future<Output = ()>,
{
    let submission = GenerationSubmitter::new(Arc::clone(&backend))
        .submit(request)
        .await?;
    writeln!(out, "{}", submitted_json(&submission))?;

    let (observer, mut events) = ChannelObserver::new(submission.generation_id.clone());
    let handle = StatusPoller::new(backend).start_polling(
        submission.poll_target(),
        interval,
        Arc::new(observer),
    );

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => writeln!(out, "{}", event.to_json())?,
                // The session dropped its observer: it has ended.
                None => break,
            },
            _ = &mut shutdown => {
                tracing::warn!(
                    generation_id = %submission.generation_id,
                    "Interrupted, stopping generation polling",
                );
                return Ok(handle.stop_and_wait().await);
            }
        }
    }

    Ok(handle.wait().await)
}

fn submitted_json(submission: &Submission) -> serde_json::Value {
    serde_json::json!({
        "type": MSG_TYPE_GENERATION_SUBMITTED,
        "generation_id": submission.generation_id,
        "project_id": submission.project_id,
        "status": submission.status.as_str(),
    })
}

/// Process exit status for a finished run.
pub fn exit_status(outcome: &PollOutcome) -> u8 {
    match outcome {
        PollOutcome::Completed { .. } => 0,
        PollOutcome::Failed { .. } => 1,
        PollOutcome::Cancelled => EXIT_INTERRUPTED,
    }
}
