//! Event type names for generation lifecycle notifications.
//!
//! Used as the `type` tag when lifecycle events are serialized for
//! consumers outside the process (CLI JSON output, UI bridges).

/// Progress update (percentage).
pub const MSG_TYPE_GENERATION_PROGRESS: &str = "generation_progress";

/// The normalized job status changed.
pub const MSG_TYPE_GENERATION_STATUS: &str = "generation_status";

/// Job completed and the final video URL is known.
pub const MSG_TYPE_GENERATION_COMPLETED: &str = "generation_completed";

/// Non-fatal problem (e.g. the video list refresh after completion failed).
pub const MSG_TYPE_GENERATION_WARNING: &str = "generation_warning";

/// Job failed, or polling hit an unrecoverable error.
pub const MSG_TYPE_GENERATION_FAILED: &str = "generation_failed";

/// A job was accepted by the backend and polling is about to start.
pub const MSG_TYPE_GENERATION_SUBMITTED: &str = "generation_submitted";
