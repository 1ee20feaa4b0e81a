//! Shared test doubles: a scripted in-memory backend, a recording
//! observer, and a recording telemetry sink.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use vidgen_client::backend::VideoBackend;
use vidgen_client::error::GenerationError;
use vidgen_client::observer::GenerationObserver;
use vidgen_client::poller::{PollOutcome, PollTarget};
use vidgen_client::schemas::{
    CreateProjectBody, GenerateVideoBody, GenerateVideoResponse, GenerationStatusResponse,
    ProjectRef, VideoRecord,
};
use vidgen_client::telemetry::PollTelemetry;
use vidgen_core::status::JobStatus;

// ---------------------------------------------------------------------------
// Status response builders
// ---------------------------------------------------------------------------

pub fn report(status: &str, progress: Option<f64>) -> GenerationStatusResponse {
    GenerationStatusResponse {
        status: status.to_string(),
        progress,
        video_url: None,
        error: None,
    }
}

pub fn completed() -> GenerationStatusResponse {
    report("completed", None)
}

pub fn completed_with_url(url: &str) -> GenerationStatusResponse {
    GenerationStatusResponse {
        video_url: Some(url.to_string()),
        ..report("completed", Some(100.0))
    }
}

pub fn failed(message: Option<&str>) -> GenerationStatusResponse {
    GenerationStatusResponse {
        error: message.map(str::to_string),
        ..report("failed", None)
    }
}

pub fn video(generation_id: &str, url: &str) -> VideoRecord {
    VideoRecord {
        generation_id: Some(generation_id.to_string()),
        video_url: Some(url.to_string()),
        ..Default::default()
    }
}

pub fn target(generation_id: &str) -> PollTarget {
    PollTarget::new(generation_id, "proj-1")
}

// ---------------------------------------------------------------------------
// ScriptedBackend
// ---------------------------------------------------------------------------

type StatusResult = Result<GenerationStatusResponse, GenerationError>;

/// In-memory [`VideoBackend`] replaying scripted responses.
///
/// Status scripts are keyed by generation id; once a script runs out,
/// every further query reports `processing` so a session keeps polling.
pub struct ScriptedBackend {
    statuses: Mutex<HashMap<String, VecDeque<StatusResult>>>,
    videos: Mutex<HashMap<String, Result<Vec<VideoRecord>, GenerationError>>>,
    project: Mutex<Result<ProjectRef, GenerationError>>,
    generate: Mutex<Result<GenerateVideoResponse, GenerationError>>,

    pub project_bodies: Mutex<Vec<CreateProjectBody>>,
    pub generate_bodies: Mutex<Vec<GenerateVideoBody>>,
    status_calls: Mutex<HashMap<String, usize>>,
    pub video_list_calls: AtomicUsize,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self {
            statuses: Mutex::new(HashMap::new()),
            videos: Mutex::new(HashMap::new()),
            project: Mutex::new(Ok(ProjectRef {
                id: "proj-new".to_string(),
            })),
            generate: Mutex::new(Ok(GenerateVideoResponse {
                generation_id: "gen-1".to_string(),
                status: Some("queued".to_string()),
            })),
            project_bodies: Mutex::new(Vec::new()),
            generate_bodies: Mutex::new(Vec::new()),
            status_calls: Mutex::new(HashMap::new()),
            video_list_calls: AtomicUsize::new(0),
        }
    }
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_statuses(self, generation_id: &str, script: Vec<GenerationStatusResponse>) -> Self {
        self.with_status_results(generation_id, script.into_iter().map(Ok).collect())
    }

    pub fn with_status_results(self, generation_id: &str, script: Vec<StatusResult>) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .insert(generation_id.to_string(), script.into());
        self
    }

    pub fn with_videos(
        self,
        project_id: &str,
        videos: Result<Vec<VideoRecord>, GenerationError>,
    ) -> Self {
        self.videos
            .lock()
            .unwrap()
            .insert(project_id.to_string(), videos);
        self
    }

    pub fn with_project(self, result: Result<ProjectRef, GenerationError>) -> Self {
        *self.project.lock().unwrap() = result;
        self
    }

    pub fn with_generate(self, result: Result<GenerateVideoResponse, GenerationError>) -> Self {
        *self.generate.lock().unwrap() = result;
        self
    }

    pub fn status_calls(&self, generation_id: &str) -> usize {
        self.status_calls
            .lock()
            .unwrap()
            .get(generation_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn project_calls(&self) -> usize {
        self.project_bodies.lock().unwrap().len()
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_bodies.lock().unwrap().len()
    }

    pub fn network_calls(&self) -> usize {
        self.project_calls()
            + self.generate_calls()
            + self.status_calls.lock().unwrap().values().sum::<usize>()
            + self.video_list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoBackend for ScriptedBackend {
    async fn create_project(&self, body: &CreateProjectBody) -> Result<ProjectRef, GenerationError> {
        self.project_bodies.lock().unwrap().push(body.clone());
        self.project.lock().unwrap().clone()
    }

    async fn generate_video(
        &self,
        body: &GenerateVideoBody,
    ) -> Result<GenerateVideoResponse, GenerationError> {
        self.generate_bodies.lock().unwrap().push(body.clone());
        self.generate.lock().unwrap().clone()
    }

    async fn generation_status(&self, generation_id: &str) -> StatusResult {
        *self
            .status_calls
            .lock()
            .unwrap()
            .entry(generation_id.to_string())
            .or_insert(0) += 1;

        self.statuses
            .lock()
            .unwrap()
            .get_mut(generation_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(report("processing", None)))
    }

    async fn project_videos(&self, project_id: &str) -> Result<Vec<VideoRecord>, GenerationError> {
        self.video_list_calls.fetch_add(1, Ordering::SeqCst);
        self.videos
            .lock()
            .unwrap()
            .get(project_id)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

// ---------------------------------------------------------------------------
// RecordingObserver
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Progress(u8),
    Status(JobStatus),
    Success(String),
    Warning(String),
    Error(String),
}

#[derive(Default)]
pub struct RecordingObserver {
    calls: Mutex<Vec<Call>>,
}

impl RecordingObserver {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn progress(&self) -> Vec<u8> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Progress(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<JobStatus> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Status(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Success(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Warning(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Error(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }
}

impl GenerationObserver for RecordingObserver {
    fn on_progress(&self, percent: u8) {
        self.record(Call::Progress(percent));
    }

    fn on_status_change(&self, status: JobStatus) {
        self.record(Call::Status(status));
    }

    fn on_success(&self, video_url: &str) {
        self.record(Call::Success(video_url.to_string()));
    }

    fn on_warning(&self, message: &str) {
        self.record(Call::Warning(message.to_string()));
    }

    fn on_error(&self, message: &str) {
        self.record(Call::Error(message.to_string()));
    }
}

// ---------------------------------------------------------------------------
// RecordingTelemetry
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingTelemetry {
    pub unknown_statuses: Mutex<Vec<String>>,
    pub reconciliation_failures: Mutex<Vec<String>>,
    pub finished: Mutex<Vec<PollOutcome>>,
}

impl PollTelemetry for RecordingTelemetry {
    fn unknown_status(&self, _generation_id: &str, raw_status: &str) {
        self.unknown_statuses
            .lock()
            .unwrap()
            .push(raw_status.to_string());
    }

    fn reconciliation_failed(&self, _generation_id: &str, reason: &str) {
        self.reconciliation_failures
            .lock()
            .unwrap()
            .push(reason.to_string());
    }

    fn session_finished(&self, _generation_id: &str, outcome: &PollOutcome) {
        self.finished.lock().unwrap().push(outcome.clone());
    }
}
