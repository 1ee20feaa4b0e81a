//! Generation request/job value types, defaults, and validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::JobStatus;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default delay between two status queries for one job.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;

/// Message reported when the provider fails a job without saying why.
pub const GENERIC_FAILURE_MESSAGE: &str = "Video generation failed";

/// Soft warning emitted when a job completed but the follow-up video list
/// fetch could not confirm the final video.
pub const RECONCILIATION_WARNING: &str =
    "Video generated, but refreshing the project's video list failed";

/// Description attached to projects created on the fly for a submission.
pub const AUTO_PROJECT_DESCRIPTION: &str = "Created automatically for video generation";

/// Upper bound of the progress scale.
pub const MAX_PROGRESS: u8 = 100;

// ---------------------------------------------------------------------------
// GenerationRequest
// ---------------------------------------------------------------------------

/// One image-to-video submission.
///
/// Built once per attempt and never mutated; a retry builds a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Owning project. `None` means "create a project named after the prompt".
    pub project_id: Option<String>,
    pub prompt: String,
    pub source_image_url: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, source_image_url: impl Into<String>) -> Self {
        Self {
            project_id: None,
            prompt: prompt.into(),
            source_image_url: source_image_url.into(),
        }
    }

    /// Attach an existing project id.
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// The supplied project id, ignoring blank strings.
    pub fn existing_project_id(&self) -> Option<&str> {
        self.project_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Check the local preconditions of a submission.
///
/// Runs before any network call; a failure here means nothing was sent.
pub fn validate_generation_request(request: &GenerationRequest) -> Result<(), CoreError> {
    if request.source_image_url.trim().is_empty() {
        return Err(CoreError::Validation(
            "A source image is required to generate a video".to_string(),
        ));
    }
    if request.prompt.trim().is_empty() {
        return Err(CoreError::Validation(
            "A prompt is required to generate a video".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// GenerationJob
// ---------------------------------------------------------------------------

/// Last known state of one external generation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationJob {
    pub generation_id: String,
    pub status: JobStatus,
    /// Percent complete, 0-100. Never decreases while the job is active.
    pub progress: u8,
    /// Set only once the job has completed.
    pub video_url: Option<String>,
    /// Set only once the job has failed.
    pub error_message: Option<String>,
}

/// What changed when a status report was applied to a [`GenerationJob`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobUpdate {
    /// The normalized status differs from the previously observed one.
    pub status_changed: bool,
    /// The progress value to report, present only when the provider sent one.
    pub progress: Option<u8>,
}

impl GenerationJob {
    /// A freshly submitted job; the provider has not reported on it yet.
    pub fn new(generation_id: impl Into<String>) -> Self {
        Self {
            generation_id: generation_id.into(),
            status: JobStatus::Queued,
            progress: 0,
            video_url: None,
            error_message: None,
        }
    }

    /// Fold one status report into the job.
    ///
    /// `first_report` forces `status_changed` so the initial state is
    /// always surfaced. Reported progress is clamped to 0-100 and only
    /// ever moves forward.
    pub fn apply_report(
        &mut self,
        status: JobStatus,
        reported_progress: Option<f64>,
        video_url: Option<String>,
        error_message: Option<String>,
        first_report: bool,
    ) -> JobUpdate {
        let status_changed = first_report || self.status != status;
        self.status = status;

        let progress = reported_progress.map(|raw| {
            let clamped = clamp_progress(raw);
            self.progress = self.progress.max(clamped);
            self.progress
        });

        match status {
            JobStatus::Completed => {
                if video_url.is_some() {
                    self.video_url = video_url;
                }
                self.error_message = None;
            }
            JobStatus::Failed => {
                self.error_message = Some(
                    error_message
                        .filter(|msg| !msg.trim().is_empty())
                        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
                );
                self.video_url = None;
            }
            _ => {}
        }

        JobUpdate {
            status_changed,
            progress,
        }
    }
}

/// Clamp a provider progress value onto the 0-100 scale.
///
/// Non-finite values collapse to 0.
pub fn clamp_progress(raw: f64) -> u8 {
    if !raw.is_finite() {
        return 0;
    }
    raw.round().clamp(0.0, f64::from(MAX_PROGRESS)) as u8
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Validation --

    #[test]
    fn valid_request_passes() {
        let req = GenerationRequest::new("a cat surfing", "https://cdn/cat.png");
        assert!(validate_generation_request(&req).is_ok());
    }

    #[test]
    fn missing_image_is_rejected() {
        let req = GenerationRequest::new("a cat surfing", "");
        assert!(validate_generation_request(&req).is_err());
    }

    #[test]
    fn blank_prompt_is_rejected() {
        let req = GenerationRequest::new("   ", "https://cdn/cat.png");
        assert!(validate_generation_request(&req).is_err());
    }

    #[test]
    fn blank_project_id_is_treated_as_absent() {
        let req = GenerationRequest::new("p", "u").with_project("  ");
        assert_eq!(req.existing_project_id(), None);

        let req = GenerationRequest::new("p", "u").with_project("proj-1");
        assert_eq!(req.existing_project_id(), Some("proj-1"));
    }

    // -- Progress --

    #[test]
    fn clamp_progress_bounds() {
        assert_eq!(clamp_progress(-5.0), 0);
        assert_eq!(clamp_progress(42.4), 42);
        assert_eq!(clamp_progress(250.0), 100);
        assert_eq!(clamp_progress(f64::NAN), 0);
    }

    #[test]
    fn progress_never_regresses() {
        let mut job = GenerationJob::new("gen-1");
        job.apply_report(JobStatus::Generating, Some(60.0), None, None, true);
        let update = job.apply_report(JobStatus::Generating, Some(30.0), None, None, false);

        assert_eq!(update.progress, Some(60));
        assert_eq!(job.progress, 60);
    }

    #[test]
    fn missing_progress_leaves_value_untouched() {
        let mut job = GenerationJob::new("gen-1");
        job.apply_report(JobStatus::Generating, Some(40.0), None, None, true);
        let update = job.apply_report(JobStatus::Processing, None, None, None, false);

        assert_eq!(update.progress, None);
        assert_eq!(job.progress, 40);
    }

    // -- Status transitions --

    #[test]
    fn first_report_always_counts_as_a_change() {
        let mut job = GenerationJob::new("gen-1");
        let update = job.apply_report(JobStatus::Queued, Some(0.0), None, None, true);
        assert!(update.status_changed);

        let update = job.apply_report(JobStatus::Queued, Some(0.0), None, None, false);
        assert!(!update.status_changed);
    }

    #[test]
    fn failure_without_message_uses_generic_text() {
        let mut job = GenerationJob::new("gen-1");
        job.apply_report(JobStatus::Failed, None, None, Some(" ".into()), true);
        assert_eq!(job.error_message.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
    }

    #[test]
    fn completion_records_video_url() {
        let mut job = GenerationJob::new("gen-1");
        job.apply_report(
            JobStatus::Completed,
            Some(100.0),
            Some("https://cdn/v.mp4".into()),
            None,
            true,
        );
        assert_eq!(job.video_url.as_deref(), Some("https://cdn/v.mp4"));
        assert!(job.error_message.is_none());
    }
}
