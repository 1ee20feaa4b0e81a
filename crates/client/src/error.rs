//! Error taxonomy for submission and polling.
//!
//! [`GenerationError`] is what callers see. Backend error payloads are
//! decoded by [`error_from_response`] so that machine-readable provider
//! codes (insufficient credits, invalid image, ...) survive as
//! [`ProviderErrorCode`] values instead of being flattened into text.

use std::fmt;

use vidgen_core::error::CoreError;

/// Errors surfaced by the submitter and the poller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Bad input. Raised before any network call.
    #[error("{0}")]
    Validation(String),

    /// Generic backend or transport failure.
    #[error("Video service error: {0}")]
    Service(String),

    /// The backend rejected the request with a machine-readable code.
    #[error("{message}")]
    Provider {
        code: ProviderErrorCode,
        message: String,
    },

    /// The backend answered, but not with the shape we expect.
    #[error("Malformed response from video service: {0}")]
    MalformedResponse(String),
}

impl GenerationError {
    /// The provider code, when the backend supplied one.
    pub fn provider_code(&self) -> Option<&ProviderErrorCode> {
        match self {
            Self::Provider { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<CoreError> for GenerationError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::Validation(msg),
        }
    }
}

/// Machine-readable rejection codes reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    InsufficientCredits,
    InvalidImage,
    InvalidPrompt,
    RateLimited,
    /// Any other code, kept verbatim.
    Other(String),
}

impl ProviderErrorCode {
    /// Parse a backend code. Case, dashes and spaces are ignored.
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();

        match normalized.as_str() {
            "INSUFFICIENT_CREDITS" | "INSUFFICIENT_CREDIT" => Self::InsufficientCredits,
            "INVALID_IMAGE" => Self::InvalidImage,
            "INVALID_PROMPT" => Self::InvalidPrompt,
            "RATE_LIMITED" | "RATE_LIMIT" | "RATE_LIMIT_EXCEEDED" | "TOO_MANY_REQUESTS" => {
                Self::RateLimited
            }
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::InsufficientCredits => "INSUFFICIENT_CREDITS",
            Self::InvalidImage => "INVALID_IMAGE",
            Self::InvalidPrompt => "INVALID_PROMPT",
            Self::RateLimited => "RATE_LIMITED",
            Self::Other(code) => code,
        }
    }

    /// Message used when the backend sends a code but no text.
    fn default_message(&self) -> String {
        match self {
            Self::InsufficientCredits => "Not enough credits to generate this video".to_string(),
            Self::InvalidImage => "The source image was rejected by the video service".to_string(),
            Self::InvalidPrompt => "The prompt was rejected by the video service".to_string(),
            Self::RateLimited => "Too many requests; try again shortly".to_string(),
            Self::Other(code) => format!("Video service rejected the request ({code})"),
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build a [`GenerationError`] from a non-2xx response.
///
/// Recognised payload shapes:
/// `{"code": "...", "message": "..."}`,
/// `{"error": "..."}`, and `{"error": {"code": "...", "message": "..."}}`.
/// Without a code the result is [`GenerationError::Service`].
pub fn error_from_response(status: u16, body: &str) -> GenerationError {
    let payload: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let nested = payload.as_ref().and_then(|p| p.get("error"));

    let text_field = |value: Option<&serde_json::Value>, key: &str| {
        value
            .and_then(|v| v.get(key))
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let code = text_field(payload.as_ref(), "code")
        .or_else(|| text_field(payload.as_ref(), "errorCode"))
        .or_else(|| text_field(nested, "code"));

    let message = text_field(payload.as_ref(), "message")
        .or_else(|| {
            nested
                .and_then(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .or_else(|| text_field(nested, "message"));

    match code {
        Some(code) => {
            let code = ProviderErrorCode::parse(&code);
            let message = message.unwrap_or_else(|| code.default_message());
            GenerationError::Provider { code, message }
        }
        None => {
            let detail = message.unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    "no response body".to_string()
                } else {
                    trimmed.to_string()
                }
            });
            GenerationError::Service(format!("HTTP {status}: {detail}"))
        }
    }
}
