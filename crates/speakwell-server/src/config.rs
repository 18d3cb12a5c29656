//! Request pipeline configuration.

use speakwell_analysis::AnalysisOptions;
use speakwell_settings::SpeakwellSettings;

/// Limits and thresholds applied to each upload.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Exact `file` part content types accepted.
    pub allowed_content_types: Vec<String>,
    /// Longest accepted clip, in seconds.
    pub max_duration_secs: f64,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
    /// Scoring thresholds.
    pub analysis: AnalysisOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&SpeakwellSettings::default())
    }
}

impl From<&SpeakwellSettings> for PipelineConfig {
    fn from(settings: &SpeakwellSettings) -> Self {
        Self {
            allowed_content_types: settings.analysis.allowed_content_types.clone(),
            max_duration_secs: settings.analysis.max_duration_secs,
            max_upload_bytes: settings.server.max_upload_bytes,
            analysis: AnalysisOptions {
                pronunciation_threshold: settings.analysis.pronunciation_threshold,
                pause_threshold_sec: settings.analysis.pause_threshold_sec,
            },
        }
    }
}
