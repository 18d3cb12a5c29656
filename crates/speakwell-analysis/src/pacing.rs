//! Words-per-minute pacing.

use serde::{Deserialize, Serialize};
use speakwell_core::Word;
use speakwell_core::rounding::round_half_even;

/// Below this rate the speaker is told to speed up.
pub const MIN_APPROPRIATE_WPM: u32 = 90;
/// Above this rate the speaker is told to slow down.
pub const MAX_APPROPRIATE_WPM: u32 = 150;

/// Pacing verdict. Serializes as the feedback sentence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaceFeedback {
    /// `wpm < 90`.
    #[serde(rename = "Too slow")]
    TooSlow,
    /// `90 <= wpm <= 150`.
    #[serde(rename = "Your speaking pace is appropriate.")]
    Appropriate,
    /// `wpm > 150`.
    #[serde(rename = "Too fast")]
    TooFast,
}

impl PaceFeedback {
    /// Classify a words-per-minute rate.
    pub fn from_wpm(wpm: u32) -> Self {
        if wpm < MIN_APPROPRIATE_WPM {
            Self::TooSlow
        } else if wpm > MAX_APPROPRIATE_WPM {
            Self::TooFast
        } else {
            Self::Appropriate
        }
    }

    /// Feedback sentence shown to the speaker.
    pub fn message(self) -> &'static str {
        match self {
            Self::TooSlow => "Too slow",
            Self::Appropriate => "Your speaking pace is appropriate.",
            Self::TooFast => "Too fast",
        }
    }
}

impl std::fmt::Display for PaceFeedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Speaking rate and its verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingReport {
    /// Rounded words per minute.
    pub wpm: u32,
    /// Verdict for `wpm`.
    pub feedback: PaceFeedback,
}

/// Compute words per minute over the whole clip.
///
/// A zero, negative or non-finite duration yields `wpm = 0` instead of
/// dividing by zero.
pub fn evaluate_pacing(words: &[Word], duration_sec: f64) -> PacingReport {
    let wpm = if duration_sec > 0.0 && duration_sec.is_finite() {
        let rate = words.len() as f64 / duration_sec * 60.0;
        round_half_even(rate).max(0.0) as u32
    } else {
        0
    };

    PacingReport {
        wpm,
        feedback: PaceFeedback::from_wpm(wpm),
    }
}
