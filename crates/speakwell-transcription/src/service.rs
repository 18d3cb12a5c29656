//! Narrow interface to the external transcription service.

use async_trait::async_trait;
use speakwell_core::TranscriptResult;

use crate::chunks::AudioChunks;
use crate::errors::JobError;

/// Opaque reference to uploaded audio (the service's upload URL).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadRef(String);

impl UploadRef {
    /// Wrap a reference string.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// The raw reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UploadRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque transcription job identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    /// Wrap an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Upload, submission and status endpoints of a transcription service.
///
/// Implementors must be `Send + Sync`; one instance is shared by every
/// concurrent job.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Stream the audio blocks and return a reference to the stored audio.
    async fn upload(&self, audio: AudioChunks) -> Result<UploadRef, JobError>;

    /// Start a transcription job (punctuation and text formatting on).
    async fn submit(&self, upload: &UploadRef) -> Result<JobId, JobError>;

    /// Fetch the job's current status payload once.
    async fn poll_once(&self, job: &JobId) -> Result<TranscriptResult, JobError>;
}
