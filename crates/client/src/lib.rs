//! Client side of the video-generation lifecycle.
//!
//! Provides the REST client for the generation backend, the
//! [`GenerationSubmitter`](submitter::GenerationSubmitter) that turns a
//! request into a job id, and the
//! [`StatusPoller`](poller::StatusPoller) that drives one job to a
//! terminal state and reconciles the final video URL.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod events;
pub mod observer;
pub mod poller;
pub mod schemas;
pub mod submitter;
pub mod telemetry;
