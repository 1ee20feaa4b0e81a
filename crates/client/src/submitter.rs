//! Generation request submission.
//!
//! [`GenerationSubmitter`] validates a [`GenerationRequest`], resolves
//! the owning project (creating one when none was given) and asks the
//! backend to start a job. It holds no per-submission state, so one
//! instance can serve any number of callers.

use std::sync::Arc;

use vidgen_core::generation::{
    validate_generation_request, GenerationRequest, AUTO_PROJECT_DESCRIPTION,
};
use vidgen_core::status::{normalize_status, JobStatus};

use crate::backend::VideoBackend;
use crate::error::GenerationError;
use crate::poller::PollTarget;
use crate::schemas::{CreateProjectBody, GenerateVideoBody};

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Backend-assigned job id.
    pub generation_id: String,
    /// Project the job belongs to (possibly created for this submission).
    pub project_id: String,
    /// Initial status reported by the backend, `Queued` when it sent none.
    pub status: JobStatus,
}

impl Submission {
    /// What the poller needs to follow this job.
    pub fn poll_target(&self) -> PollTarget {
        PollTarget::new(self.generation_id.clone(), self.project_id.clone())
    }
}

pub struct GenerationSubmitter {
    backend: Arc<dyn VideoBackend>,
}

impl GenerationSubmitter {
    pub fn new(backend: Arc<dyn VideoBackend>) -> Self {
        Self { backend }
    }

    /// Submit one generation request.
    ///
    /// Issues at most two calls: `POST /projects` when the request has no
    /// project id, then `POST /videos/generate`. Validation failures
    /// return before anything is sent. Nothing is retried.
    pub async fn submit(&self, request: &GenerationRequest) -> Result<Submission, GenerationError> {
        validate_generation_request(request)?;

        let prompt = request.prompt.trim();

        let project_id = match request.existing_project_id() {
            Some(id) => id.to_string(),
            None => self.create_project(prompt).await?,
        };

        let body = GenerateVideoBody {
            prompt: prompt.to_string(),
            image_url: request.source_image_url.trim().to_string(),
            project_id: project_id.clone(),
        };

        let response = self.backend.generate_video(&body).await.map_err(|e| {
            tracing::error!(project_id = %project_id, error = %e, "Video generation request failed");
            e
        })?;

        let generation_id = response.generation_id.trim().to_string();
        if generation_id.is_empty() {
            return Err(GenerationError::MalformedResponse(
                "generation response did not include a generation id".to_string(),
            ));
        }

        let status = response
            .status
            .as_deref()
            .map(normalize_status)
            .unwrap_or(JobStatus::Queued);

        tracing::info!(
            generation_id = %generation_id,
            project_id = %project_id,
            status = %status,
            "Video generation submitted",
        );

        Ok(Submission {
            generation_id,
            project_id,
            status,
        })
    }

    /// Create a project named after the prompt and return its id.
    async fn create_project(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = CreateProjectBody {
            name: prompt.to_string(),
            description: AUTO_PROJECT_DESCRIPTION.to_string(),
        };

        let project = self.backend.create_project(&body).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to create project for generation");
            e
        })?;

        let id = project.id.trim().to_string();
        if id.is_empty() {
            return Err(GenerationError::MalformedResponse(
                "project response did not include an id".to_string(),
            ));
        }

        tracing::info!(project_id = %id, "Created project for generation");
        Ok(id)
    }
}
