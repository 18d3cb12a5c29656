//! Long-gap detection between consecutive words.

use serde::{Deserialize, Serialize};
use speakwell_core::Word;
use speakwell_core::rounding::round_to;

/// Default gap (seconds) a silence must exceed to count as a pause.
pub const DEFAULT_PAUSE_THRESHOLD_SEC: f64 = 0.5;

/// Pause verdict. Serializes as the feedback sentence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PauseFeedback {
    /// No gap exceeded the threshold.
    #[serde(rename = "No significant pauses detected.")]
    NoSignificantPauses,
    /// At least one gap exceeded the threshold.
    #[serde(rename = "Try to reduce long pauses to improve fluency.")]
    ReduceLongPauses,
}

impl PauseFeedback {
    /// Feedback sentence shown to the speaker.
    pub fn message(self) -> &'static str {
        match self {
            Self::NoSignificantPauses => "No significant pauses detected.",
            Self::ReduceLongPauses => "Try to reduce long pauses to improve fluency.",
        }
    }
}

impl std::fmt::Display for PauseFeedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Pause count and total silence above the threshold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PauseReport {
    /// Number of gaps longer than the threshold.
    pub count: u32,
    /// Sum of those gaps in seconds, 2 decimals.
    pub total_pause_sec: f64,
    /// Verdict for `count`.
    pub feedback: PauseFeedback,
}

/// Count gaps between adjacent words that exceed `pause_threshold_sec`.
///
/// Pairs are taken in transcript order. Overlapping words produce a negative
/// gap, which never exceeds the threshold and so never counts.
pub fn detect_pauses(words: &[Word], pause_threshold_sec: f64) -> PauseReport {
    let mut count = 0u32;
    let mut total = 0.0f64;

    for pair in words.windows(2) {
        let gap = pair[1].start_sec() - pair[0].end_sec();
        if gap > pause_threshold_sec {
            count += 1;
            total += gap;
        }
    }

    let feedback = if count > 0 {
        PauseFeedback::ReduceLongPauses
    } else {
        PauseFeedback::NoSignificantPauses
    };

    PauseReport {
        count,
        total_pause_sec: round_to(total, 2),
        feedback,
    }
}
