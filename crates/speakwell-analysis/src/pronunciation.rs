//! Confidence-based pronunciation scoring.

use serde::{Deserialize, Serialize};
use speakwell_core::Word;
use speakwell_core::rounding::{round_half_even, round_to};

/// Default confidence below which a word counts as mispronounced.
pub const DEFAULT_PRONUNCIATION_THRESHOLD: f64 = 0.85;

/// A word the recognizer was not confident about.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MispronouncedWord {
    /// Token text.
    pub word: String,
    /// Start in seconds, 3 decimals.
    #[serde(rename = "start")]
    pub start_sec: f64,
    /// Recognition confidence.
    pub confidence: f64,
}

impl From<&Word> for MispronouncedWord {
    fn from(w: &Word) -> Self {
        Self {
            word: w.text.clone(),
            start_sec: round_to(w.start_sec(), 3),
            confidence: w.confidence,
        }
    }
}

/// Pronunciation score plus the words that dragged it down.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PronunciationReport {
    /// Mean confidence scaled to 0-100.
    pub score: u8,
    /// Words below the threshold, in transcript order.
    pub mispronounced: Vec<MispronouncedWord>,
}

/// Score pronunciation as the rounded mean word confidence.
///
/// An empty transcript scores 0 with no mispronounced words. Words whose
/// confidence is strictly below `threshold` are listed in original order.
pub fn compute_pronunciation_score(words: &[Word], threshold: f64) -> PronunciationReport {
    if words.is_empty() {
        return PronunciationReport::default();
    }

    let total: f64 = words.iter().map(|w| w.confidence).sum();
    let mean = total / words.len() as f64;
    let score = round_half_even(mean * 100.0).clamp(0.0, 100.0) as u8;

    let mispronounced = words
        .iter()
        .filter(|w| w.confidence < threshold)
        .map(MispronouncedWord::from)
        .collect();

    PronunciationReport {
        score,
        mispronounced,
    }
}
