//! Upload checks applied before any audio leaves the process.

use thiserror::Error;

use crate::audio::ProbeError;

/// Rejected upload. Rendered as a 4xx; never retried.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Content type outside the allowed set.
    #[error("Only WAV or MP3 allowed")]
    UnsupportedContentType {
        /// Declared content type of the `file` part, if any.
        content_type: Option<String>,
    },
    /// Clip longer than the configured maximum.
    #[error("Audio is greater than {} s", format_secs(*max_secs))]
    TooLong {
        /// Measured duration.
        duration_secs: f64,
        /// Configured maximum.
        max_secs: f64,
    },
    /// Duration could not be measured.
    #[error("Could not read audio: {0}")]
    UndecodableAudio(#[from] ProbeError),
    /// Request had no `file` part.
    #[error("No file uploaded")]
    MissingFile,
}

impl ValidationError {
    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::UnsupportedContentType { .. } => "unsupported_type",
            Self::TooLong { .. } => "too_long",
            Self::UndecodableAudio(_) => "undecodable",
            Self::MissingFile => "missing_file",
        }
    }
}

/// `60.0` renders as `60`, `12.5` as `12.5`.
fn format_secs(secs: f64) -> String {
    if secs.fract() == 0.0 {
        format!("{secs:.0}")
    } else {
        secs.to_string()
    }
}

/// Accept `content_type` only if it is exactly one of `allowed`.
pub fn check_content_type(
    content_type: Option<&str>,
    allowed: &[String],
) -> Result<(), ValidationError> {
    match content_type {
        Some(ct) if allowed.iter().any(|a| a == ct) => Ok(()),
        other => Err(ValidationError::UnsupportedContentType {
            content_type: other.map(str::to_string),
        }),
    }
}

/// Accept clips up to and including `max_secs`.
pub fn check_duration(duration_secs: f64, max_secs: f64) -> Result<(), ValidationError> {
    if duration_secs > max_secs {
        return Err(ValidationError::TooLong {
            duration_secs,
            max_secs,
        });
    }
    Ok(())
}
