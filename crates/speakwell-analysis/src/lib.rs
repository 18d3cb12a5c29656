//! # speakwell-analysis
//!
//! Turns a word-level transcript into speaking feedback.
//!
//! Every function here is pure: outputs depend only on the word list, the
//! clip duration and the thresholds passed in. Nothing is cached and nothing
//! errors; an empty transcript is a defined zero-value case.
//!
//! ```text
//! words ─┬─ compute_pronunciation_score ─┐
//!        ├─ evaluate_pacing (+ duration) ─┼─ generate_feedback_summary
//!        └─ detect_pauses ───────────────┘
//! ```

#![deny(unsafe_code)]

pub mod pacing;
pub mod pauses;
pub mod pronunciation;
pub mod summary;

use serde::{Deserialize, Serialize};
use speakwell_core::Word;

pub use pacing::{PaceFeedback, PacingReport, evaluate_pacing};
pub use pauses::{DEFAULT_PAUSE_THRESHOLD_SEC, PauseFeedback, PauseReport, detect_pauses};
pub use pronunciation::{
    DEFAULT_PRONUNCIATION_THRESHOLD, MispronouncedWord, PronunciationReport,
    compute_pronunciation_score,
};
pub use summary::generate_feedback_summary;

/// Thresholds used by [`analyze`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Words below this confidence are reported as mispronounced.
    pub pronunciation_threshold: f64,
    /// Gaps strictly longer than this (seconds) count as pauses.
    pub pause_threshold_sec: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            pronunciation_threshold: DEFAULT_PRONUNCIATION_THRESHOLD,
            pause_threshold_sec: DEFAULT_PAUSE_THRESHOLD_SEC,
        }
    }
}

/// All derived reports for one clip.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpeechAnalysis {
    /// Confidence-based pronunciation score.
    pub pronunciation: PronunciationReport,
    /// Words-per-minute pacing.
    pub pacing: PacingReport,
    /// Long-gap statistics.
    pub pauses: PauseReport,
    /// Pacing, pronunciation and pause feedback in one sentence group.
    pub summary: String,
}

/// Run every metric over one transcript.
pub fn analyze(words: &[Word], duration_sec: f64, options: &AnalysisOptions) -> SpeechAnalysis {
    let pronunciation = compute_pronunciation_score(words, options.pronunciation_threshold);
    let pacing = evaluate_pacing(words, duration_sec);
    let pauses = detect_pauses(words, options.pause_threshold_sec);
    let summary = generate_feedback_summary(
        pacing.feedback.message(),
        &pronunciation.mispronounced,
        pauses.feedback.message(),
    );

    SpeechAnalysis {
        pronunciation,
        pacing,
        pauses,
        summary,
    }
}
