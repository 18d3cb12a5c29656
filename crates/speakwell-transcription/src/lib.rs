//! # speakwell-transcription
//!
//! Drives one external transcription job from raw audio to a completed
//! transcript.
//!
//! ```text
//! audio bytes → AudioChunks (5 MiB blocks) → upload → upload URL
//! → submit (punctuate, format_text) → job id
//! → status query every 2 s → completed transcript | job error
//! ```
//!
//! The network side sits behind [`TranscriptionService`] and the poll wait
//! behind [`Sleeper`], so [`JobOrchestrator`] can be driven in tests without
//! a server or real delays. [`AssemblyAiClient`] is the production service.

#![deny(unsafe_code)]

pub mod assemblyai;
pub mod chunks;
pub mod clock;
pub mod errors;
pub mod metric_names;
pub mod orchestrator;
pub mod service;

pub use assemblyai::{AssemblyAiClient, DEFAULT_BASE_URL};
pub use chunks::{AudioChunks, DEFAULT_CHUNK_SIZE};
pub use clock::{Sleeper, TokioSleeper};
pub use errors::{JobError, JobStage};
pub use orchestrator::{DEFAULT_POLL_INTERVAL, JobOrchestrator, JobState};
pub use service::{JobId, TranscriptionService, UploadRef};
