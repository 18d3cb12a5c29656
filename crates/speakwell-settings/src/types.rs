//! Settings types.
//!
//! All structs deserialize with `#[serde(default)]` so a settings file only
//! needs the keys it overrides.

use serde::{Deserialize, Serialize};

/// Root settings object.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpeakwellSettings {
    /// HTTP listener settings.
    pub server: ServerSettings,
    /// External transcription service settings.
    pub transcription: TranscriptionSettings,
    /// Input limits and metric thresholds.
    pub analysis: AnalysisSettings,
    /// Log output settings.
    pub logging: LoggingSettings,
}

/// HTTP listener settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Maximum accepted request body in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

/// External transcription service settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranscriptionSettings {
    /// API base URL, without trailing slash.
    pub base_url: String,
    /// Delay between job status queries in milliseconds.
    pub poll_interval_ms: u64,
    /// Upload chunk size in bytes.
    pub chunk_size_bytes: usize,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.assemblyai.com/v2".to_string(),
            poll_interval_ms: 2_000,
            chunk_size_bytes: 5_242_880,
        }
    }
}

/// Input limits and metric thresholds.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisSettings {
    /// Longest accepted clip in seconds.
    pub max_duration_secs: f64,
    /// Content types accepted by `/transcribe`.
    pub allowed_content_types: Vec<String>,
    /// Confidence below which a word is flagged.
    pub pronunciation_threshold: f64,
    /// Silence (seconds) above which a gap counts as a pause.
    pub pause_threshold_sec: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            max_duration_secs: 60.0,
            allowed_content_types: vec!["audio/wav".to_string(), "audio/mpeg".to_string()],
            pronunciation_threshold: 0.85,
            pause_threshold_sec: 0.5,
        }
    }
}

/// Log verbosity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose.
    Trace,
    /// Debug output.
    Debug,
    /// Default.
    #[default]
    Info,
    /// Warnings and errors only.
    Warn,
    /// Errors only.
    Error,
}

impl LogLevel {
    /// Directive string for `tracing_subscriber::EnvFilter`.
    pub fn as_filter_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Parse a level name, case-insensitive.
    pub fn parse(val: &str) -> Option<Self> {
        match val.to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// Log output settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default level; `RUST_LOG` takes precedence when set.
    pub level: LogLevel,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}
