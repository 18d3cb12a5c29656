//! Job orchestration errors.

use thiserror::Error;

/// Pipeline stage an error came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobStage {
    /// Sending audio bytes.
    Upload,
    /// Creating the transcription job.
    Submission,
    /// Querying job status.
    Poll,
    /// The job itself reported failure.
    Transcription,
}

impl JobStage {
    /// Metric/log label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Submission => "submission",
            Self::Poll => "poll",
            Self::Transcription => "transcription",
        }
    }
}

/// Errors from a transcription job. None are retried by the orchestrator.
#[derive(Debug, Error)]
pub enum JobError {
    /// The service rejected or failed the audio upload.
    #[error("audio upload failed: {message}")]
    Upload {
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// Response body or transport error.
        message: String,
    },

    /// The service refused to create the job.
    #[error("job submission failed: {message}")]
    Submission {
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// Response body or transport error.
        message: String,
    },

    /// A status query failed.
    #[error("job status query failed: {message}")]
    Poll {
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// Response body or transport error.
        message: String,
    },

    /// The job finished with status `error`.
    #[error("transcription failed: {message}")]
    Transcription {
        /// Service-provided reason.
        message: String,
    },
}

impl JobError {
    /// Build the request-level error for `stage`.
    ///
    /// `JobStage::Transcription` has no HTTP status; the status is dropped.
    pub fn request(stage: JobStage, status: Option<u16>, message: impl Into<String>) -> Self {
        let message = message.into();
        match stage {
            JobStage::Upload => Self::Upload { status, message },
            JobStage::Submission => Self::Submission { status, message },
            JobStage::Poll => Self::Poll { status, message },
            JobStage::Transcription => Self::Transcription { message },
        }
    }

    /// Stage the error came from.
    pub fn stage(&self) -> JobStage {
        match self {
            Self::Upload { .. } => JobStage::Upload,
            Self::Submission { .. } => JobStage::Submission,
            Self::Poll { .. } => JobStage::Poll,
            Self::Transcription { .. } => JobStage::Transcription,
        }
    }

    /// HTTP status returned by the service, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upload { status, .. }
            | Self::Submission { status, .. }
            | Self::Poll { status, .. } => *status,
            Self::Transcription { .. } => None,
        }
    }

    /// Underlying message without the stage prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Upload { message, .. }
            | Self::Submission { message, .. }
            | Self::Poll { message, .. }
            | Self::Transcription { message } => message,
        }
    }
}
