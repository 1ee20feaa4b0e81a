//! Domain types for the video-generation lifecycle.
//!
//! Pure values and rules only: request validation, the job state
//! machine vocabulary, and the shared defaults. Everything that talks to
//! the network lives in `vidgen-client`.

pub mod error;
pub mod generation;
pub mod job_events;
pub mod status;
