//! REST client for the generation backend.
//!
//! Wraps the backend's HTTP endpoints (project creation, generation
//! submission, status, project video list) using [`reqwest`].

use async_trait::async_trait;

use crate::backend::VideoBackend;
use crate::config::ClientConfig;
use crate::error::{error_from_response, GenerationError};
use crate::schemas::{
    CreateProjectBody, GenerateVideoBody, GenerateVideoResponse, GenerationStatusResponse,
    ProjectRef, VideoList, VideoRecord,
};

/// HTTP client for one generation backend.
pub struct HttpVideoApi {
    client: reqwest::Client,
    api_url: String,
    api_token: Option<String>,
}

/// Errors from the HTTP layer, before they are classified into
/// [`GenerationError`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Backend API error ({status}): {body}")]
    Status {
        status: u16,
        /// Raw response body, parsed later for error codes.
        body: String,
    },

    /// A 2xx response whose body did not match the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl From<ApiError> for GenerationError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Request(e) => GenerationError::Service(e.to_string()),
            ApiError::Status { status, body } => error_from_response(status, &body),
            ApiError::Decode(msg) => GenerationError::MalformedResponse(msg),
        }
    }
}

impl HttpVideoApi {
    /// Create a client from configuration.
    ///
    /// Every request carries the configured transport timeout; the
    /// overall generation has none.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_client(
            client,
            config.api_url.clone(),
            config.api_token.clone(),
        ))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String, api_token: Option<String>) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// `POST /projects`
    pub async fn create_project(&self, body: &CreateProjectBody) -> Result<ProjectRef, ApiError> {
        let response = self
            .authorized(self.client.post(format!("{}/projects", self.api_url)))
            .json(body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `POST /videos/generate`
    pub async fn generate_video(
        &self,
        body: &GenerateVideoBody,
    ) -> Result<GenerateVideoResponse, ApiError> {
        let response = self
            .authorized(self.client.post(format!("{}/videos/generate", self.api_url)))
            .json(body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `GET /videos/generation/{id}/status`
    pub async fn generation_status(
        &self,
        generation_id: &str,
    ) -> Result<GenerationStatusResponse, ApiError> {
        let response = self
            .authorized(self.client.get(format!(
                "{}/videos/generation/{}/status",
                self.api_url, generation_id
            )))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `GET /videos/project/{projectId}`
    pub async fn project_videos(&self, project_id: &str) -> Result<Vec<VideoRecord>, ApiError> {
        let response = self
            .authorized(
                self.client
                    .get(format!("{}/videos/project/{}", self.api_url, project_id)),
            )
            .send()
            .await?;

        let list: VideoList = Self::parse_response(response).await?;
        Ok(list.into_vec())
    }

    // ---- private helpers ----

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Status`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    ///
    /// The body is read as text first so that shape mismatches are
    /// reported as [`ApiError::Decode`] rather than transport errors.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl VideoBackend for HttpVideoApi {
    async fn create_project(&self, body: &CreateProjectBody) -> Result<ProjectRef, GenerationError> {
        Ok(HttpVideoApi::create_project(self, body).await?)
    }

    async fn generate_video(
        &self,
        body: &GenerateVideoBody,
    ) -> Result<GenerateVideoResponse, GenerationError> {
        Ok(HttpVideoApi::generate_video(self, body).await?)
    }

    async fn generation_status(
        &self,
        generation_id: &str,
    ) -> Result<GenerationStatusResponse, GenerationError> {
        Ok(HttpVideoApi::generation_status(self, generation_id).await?)
    }

    async fn project_videos(&self, project_id: &str) -> Result<Vec<VideoRecord>, GenerationError> {
        Ok(HttpVideoApi::project_videos(self, project_id).await?)
    }
}
