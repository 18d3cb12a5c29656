//! # speakwell-core
//!
//! Shared data model for the speakwell service.
//!
//! - [`Word`]: one transcribed token with millisecond timing and confidence
//! - [`TranscriptResult`] / [`JobStatus`]: the external job's status payload
//! - [`TimedWord`]: the seconds-based word shape returned to clients
//! - [`rounding`]: ties-to-even rounding shared by every derived metric

#![deny(unsafe_code)]

pub mod rounding;
pub mod transcript;

pub use transcript::{JobStatus, TimedWord, TranscriptResult, Word};
