//! Transcript types shared by the orchestrator, the metrics engine and the
//! HTTP layer.
//!
//! Field names on the wire follow the transcription service: word timings
//! arrive as `start`/`end` in milliseconds and job failures carry an `error`
//! string.

use serde::{Deserialize, Serialize};

use crate::rounding::{ms_to_secs, round_to};

/// A single transcribed token with timing and confidence.
///
/// Words are kept in the order the service delivered them (ascending start
/// time); nothing in the service re-sorts them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Token text, punctuation included.
    pub text: String,
    /// Start offset in milliseconds.
    #[serde(rename = "start")]
    pub start_ms: i64,
    /// End offset in milliseconds.
    #[serde(rename = "end")]
    pub end_ms: i64,
    /// Recognition confidence in `[0, 1]`.
    pub confidence: f64,
}

impl Word {
    /// Build a word from its parts.
    pub fn new(text: impl Into<String>, start_ms: i64, end_ms: i64, confidence: f64) -> Self {
        Self {
            text: text.into(),
            start_ms,
            end_ms,
            confidence,
        }
    }

    /// Start offset in seconds.
    pub fn start_sec(&self) -> f64 {
        ms_to_secs(self.start_ms)
    }

    /// End offset in seconds.
    pub fn end_sec(&self) -> f64 {
        ms_to_secs(self.end_ms)
    }
}

/// Lifecycle state of an external transcription job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted, waiting for a worker.
    Queued,
    /// Being transcribed.
    Processing,
    /// Finished; text and words are populated.
    Completed,
    /// Failed; `error_message` explains why.
    Error,
}

impl JobStatus {
    /// Whether polling should stop at this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    /// Wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status payload of a transcription job.
///
/// Non-terminal snapshots usually carry no text or words; both default to
/// empty so a `queued` payload deserializes cleanly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranscriptResult {
    /// Opaque job identifier assigned by the service.
    pub id: String,
    /// Current job status.
    pub status: JobStatus,
    /// Full transcript text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    /// Word-level timings in transcript order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub words: Vec<Word>,
    /// Service-provided failure reason when `status` is `error`.
    #[serde(rename = "error", default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// The service sends explicit `null` for text/words until a job completes.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Client-facing word shape: seconds instead of milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimedWord {
    /// Token text.
    pub word: String,
    /// Start in seconds, 3 decimals.
    pub start: f64,
    /// End in seconds, 3 decimals.
    pub end: f64,
    /// Recognition confidence.
    pub confidence: f64,
}

impl From<&Word> for TimedWord {
    fn from(w: &Word) -> Self {
        Self {
            word: w.text.clone(),
            start: round_to(w.start_sec(), 3),
            end: round_to(w.end_sec(), 3),
            confidence: w.confidence,
        }
    }
}
