//! # speakwell-server
//!
//! Axum HTTP surface for speech feedback.
//!
//! - `POST /transcribe`: multipart upload (`file` field), validated for
//!   content type and duration, transcribed, then scored
//! - `GET /health`: liveness and uptime
//! - `GET /metrics`: Prometheus text exposition
//! - Graceful shutdown via `tokio::signal` + `CancellationToken`

#![deny(unsafe_code)]

pub mod audio;
pub mod config;
pub mod errors;
pub mod health;
pub mod metrics;
pub mod pipeline;
pub mod response;
pub mod server;
pub mod shutdown;
pub mod validation;

pub use audio::{AudioProbe, ProbeError, SymphoniaProbe};
pub use config::PipelineConfig;
pub use errors::ApiError;
pub use pipeline::{TranscribePipeline, Upload};
pub use response::TranscriptionResponse;
pub use server::{AppState, SpeakwellServer};
pub use shutdown::ShutdownCoordinator;
pub use validation::ValidationError;
