//! Wire types for the generation backend's REST surface.
//!
//! Bodies are camelCase JSON. The backend is not entirely consistent
//! about id types, key spellings and list envelopes, so responses are
//! decoded through lenient `Raw*` shapes that keep every spelling in its
//! own field and then pick one.

use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /videos/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoBody {
    pub prompt: String,
    pub image_url: String,
    pub project_id: String,
}

/// Response of `POST /videos/generate`.
///
/// The job id is read from `generationId`, then `generation_id`, then
/// `id`. A response may carry a row `id` next to the job id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawGenerateVideoResponse")]
pub struct GenerateVideoResponse {
    pub generation_id: String,
    pub status: Option<String>,
}

#[derive(Deserialize)]
struct RawGenerateVideoResponse {
    #[serde(default, rename = "generationId", deserialize_with = "opt_string_or_number")]
    generation_id_camel: Option<String>,
    #[serde(default, rename = "generation_id", deserialize_with = "opt_string_or_number")]
    generation_id_snake: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    id: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl TryFrom<RawGenerateVideoResponse> for GenerateVideoResponse {
    type Error = String;

    fn try_from(raw: RawGenerateVideoResponse) -> Result<Self, Self::Error> {
        let generation_id =
            first_present([raw.generation_id_camel, raw.generation_id_snake, raw.id])
                .ok_or_else(|| "missing field `generationId`".to_string())?;
        Ok(Self {
            generation_id,
            status: raw.status,
        })
    }
}

/// Body of `POST /projects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateProjectBody {
    pub name: String,
    pub description: String,
}

/// Response of `POST /projects`; only the id is needed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectRef {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

/// Response of `GET /videos/generation/{id}/status`.
///
/// The failure text is read from `error` (a string, or an object with a
/// `message`), then `errorMessage`, then `error_message`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawGenerationStatusResponse")]
pub struct GenerationStatusResponse {
    pub status: String,
    /// Percent complete. Absent while the provider has not started.
    pub progress: Option<f64>,
    pub video_url: Option<String>,
    pub error: Option<String>,
}

#[derive(Deserialize)]
struct RawGenerationStatusResponse {
    status: String,
    #[serde(default)]
    progress: Option<f64>,
    #[serde(default, rename = "videoUrl")]
    video_url_camel: Option<String>,
    #[serde(default, rename = "video_url")]
    video_url_snake: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default, rename = "errorMessage")]
    error_message_camel: Option<String>,
    #[serde(default, rename = "error_message")]
    error_message_snake: Option<String>,
}

impl From<RawGenerationStatusResponse> for GenerationStatusResponse {
    fn from(raw: RawGenerationStatusResponse) -> Self {
        let error_text = raw.error.and_then(|value| match value {
            serde_json::Value::String(text) => Some(text),
            other => other
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string),
        });

        Self {
            status: raw.status,
            progress: raw.progress,
            video_url: first_present([raw.video_url_camel, raw.video_url_snake]),
            error: first_present([
                error_text,
                raw.error_message_camel,
                raw.error_message_snake,
            ]),
        }
    }
}

/// One entry of `GET /videos/project/{projectId}`.
///
/// The URL is read from `videoUrl`, then `video_url`, then `url`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "RawVideoRecord")]
pub struct VideoRecord {
    pub id: Option<String>,
    pub generation_id: Option<String>,
    pub video_url: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
struct RawVideoRecord {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    id: Option<String>,
    #[serde(default, rename = "generationId", deserialize_with = "opt_string_or_number")]
    generation_id_camel: Option<String>,
    #[serde(default, rename = "generation_id", deserialize_with = "opt_string_or_number")]
    generation_id_snake: Option<String>,
    #[serde(default, rename = "videoUrl")]
    video_url_camel: Option<String>,
    #[serde(default, rename = "video_url")]
    video_url_snake: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl From<RawVideoRecord> for VideoRecord {
    fn from(raw: RawVideoRecord) -> Self {
        Self {
            id: raw.id,
            generation_id: first_present([raw.generation_id_camel, raw.generation_id_snake]),
            video_url: first_present([raw.video_url_camel, raw.video_url_snake, raw.url]),
            status: raw.status,
        }
    }
}

impl VideoRecord {
    /// Whether this entry belongs to the given generation job.
    ///
    /// Entries without a `generationId` are matched on their own `id`.
    pub fn matches_generation(&self, generation_id: &str) -> bool {
        match self.generation_id.as_deref() {
            Some(gid) => gid == generation_id,
            None => self.id.as_deref() == Some(generation_id),
        }
    }

    /// The video URL, ignoring blank strings.
    pub fn usable_video_url(&self) -> Option<&str> {
        self.video_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Envelope of the project video list: a bare array or wrapped in
/// `{"videos": [...]}` / `{"data": [...]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VideoList {
    Bare(Vec<VideoRecord>),
    Wrapped {
        #[serde(alias = "data")]
        videos: Vec<VideoRecord>,
    },
}

impl VideoList {
    pub fn into_vec(self) -> Vec<VideoRecord> {
        match self {
            Self::Bare(videos) | Self::Wrapped { videos } => videos,
        }
    }
}

/// Find the final video URL for a generation in a project's video list.
pub fn find_video_url(videos: &[VideoRecord], generation_id: &str) -> Option<String> {
    videos
        .iter()
        .filter(|v| v.matches_generation(generation_id))
        .find_map(|v| v.usable_video_url().map(str::to_string))
}

// ---- serde helpers ----

/// First candidate that is present and not blank.
fn first_present<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(deserializer).map(|v| v.map(String::from))
}
