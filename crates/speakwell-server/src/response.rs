//! `/transcribe` response body.

use serde::Serialize;
use speakwell_analysis::{MispronouncedWord, PaceFeedback, PauseFeedback, SpeechAnalysis};
use speakwell_core::{TimedWord, TranscriptResult};

/// Transcript plus every derived feedback metric for one clip.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TranscriptionResponse {
    /// Client-supplied file name.
    pub filename: Option<String>,
    /// Full transcript text.
    pub transcript: String,
    /// Words with second-based timestamps.
    pub words: Vec<TimedWord>,
    /// Measured clip duration.
    pub audio_duration_sec: f64,
    /// 0..=100.
    pub pronunciation_score: u8,
    /// Low-confidence words in transcript order.
    pub mispronounced_words: Vec<MispronouncedWord>,
    /// Words per minute, rounded.
    pub pacing_wpm: u32,
    /// Pace sentence.
    pub pacing_feedback: PaceFeedback,
    /// Gaps over the pause threshold.
    pub pause_count: u32,
    /// Sum of those gaps, seconds.
    pub total_pause_time_sec: f64,
    /// Pause sentence.
    pub pause_feedback: PauseFeedback,
    /// Combined feedback paragraph.
    pub text_feedback: String,
    /// Transcription service job id.
    pub assembly_job_id: String,
}

impl TranscriptionResponse {
    /// Assemble the response from a finished job and its analysis.
    pub fn new(
        filename: Option<String>,
        duration_secs: f64,
        transcript: TranscriptResult,
        analysis: SpeechAnalysis,
    ) -> Self {
        Self {
            filename,
            words: transcript.words.iter().map(TimedWord::from).collect(),
            transcript: transcript.text,
            audio_duration_sec: duration_secs,
            pronunciation_score: analysis.pronunciation.score,
            mispronounced_words: analysis.pronunciation.mispronounced,
            pacing_wpm: analysis.pacing.wpm,
            pacing_feedback: analysis.pacing.feedback,
            pause_count: analysis.pauses.count,
            total_pause_time_sec: analysis.pauses.total_pause_sec,
            pause_feedback: analysis.pauses.feedback,
            text_feedback: analysis.summary,
            assembly_job_id: transcript.id,
        }
    }
}
