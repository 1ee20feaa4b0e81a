//! The seam between the lifecycle logic and the generation backend.
//!
//! [`GenerationSubmitter`](crate::submitter::GenerationSubmitter) and
//! [`StatusPoller`](crate::poller::StatusPoller) only talk to a
//! [`VideoBackend`]. Production code uses
//! [`HttpVideoApi`](crate::api::HttpVideoApi); tests substitute a
//! scripted in-memory implementation.

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::schemas::{
    CreateProjectBody, GenerateVideoBody, GenerateVideoResponse, GenerationStatusResponse,
    ProjectRef, VideoRecord,
};

#[async_trait]
pub trait VideoBackend: Send + Sync {
    /// `POST /projects`
    async fn create_project(&self, body: &CreateProjectBody) -> Result<ProjectRef, GenerationError>;

    /// `POST /videos/generate`
    async fn generate_video(
        &self,
        body: &GenerateVideoBody,
    ) -> Result<GenerateVideoResponse, GenerationError>;

    /// `GET /videos/generation/{id}/status`
    async fn generation_status(
        &self,
        generation_id: &str,
    ) -> Result<GenerationStatusResponse, GenerationError>;

    /// `GET /videos/project/{projectId}`
    async fn project_videos(&self, project_id: &str) -> Result<Vec<VideoRecord>, GenerationError>;
}
