//! Command-line arguments.

use clap::Parser;
use vidgen_client::config::ClientConfig;
use vidgen_core::generation::GenerationRequest;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "vidgen",
    version,
    about = "Submit an image-to-video generation and follow it to completion"
)]
pub struct Args {
    /// Publicly reachable URL of the source image
    #[arg(long, env = "VIDGEN_IMAGE_URL")]
    pub image_url: String,

    /// Text prompt describing the motion or scene
    #[arg(long, env = "VIDGEN_PROMPT")]
    pub prompt: String,

    /// Existing project to attach the video to (one is created when omitted)
    #[arg(long, env = "VIDGEN_PROJECT_ID")]
    pub project_id: Option<String>,

    /// Override the backend base URL (`VIDGEN_API_URL`)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Override the delay between status queries (`POLL_INTERVAL_MS`)
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl Args {
    pub fn request(&self) -> GenerationRequest {
        let request = GenerationRequest::new(self.prompt.clone(), self.image_url.clone());
        match &self.project_id {
            Some(id) => request.with_project(id.clone()),
            None => request,
        }
    }

    /// Apply flag overrides on top of the environment configuration.
    pub fn apply_to(&self, config: &mut ClientConfig) {
        if let Some(url) = self.api_url.as_deref().map(str::trim) {
            if !url.is_empty() {
                config.api_url = url.trim_end_matches('/').to_string();
            }
        }
        if let Some(ms) = self.interval_ms.filter(|ms| *ms > 0) {
            config.poll_interval_ms = ms;
        }
    }
}
