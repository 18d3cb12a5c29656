//! Validate → measure → transcribe → analyze, for one upload.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Multipart;
use bytes::Bytes;
use speakwell_analysis::analyze;
use speakwell_transcription::JobOrchestrator;
use tracing::{debug, info, instrument};

use crate::audio::AudioProbe;
use crate::config::PipelineConfig;
use crate::errors::ApiError;
use crate::metrics::{
    AUDIO_DURATION_SECONDS, PRONUNCIATION_SCORE, TRANSCRIBE_DURATION_SECONDS,
    TRANSCRIBE_REQUESTS_TOTAL, UPLOADS_REJECTED_TOTAL,
};
use crate::response::TranscriptionResponse;
use crate::validation::{ValidationError, check_content_type, check_duration};

/// Multipart field carrying the audio.
pub const FILE_FIELD: &str = "file";

/// One uploaded clip.
#[derive(Clone, Debug)]
pub struct Upload {
    /// Client-supplied file name.
    pub filename: Option<String>,
    /// Declared content type of the part.
    pub content_type: Option<String>,
    /// Raw encoded audio.
    pub data: Bytes,
}

impl Upload {
    /// Read the first `file` part; other parts are skipped.
    pub async fn from_multipart(multipart: &mut Multipart) -> Result<Self, ApiError> {
        while let Some(field) = multipart.next_field().await? {
            if field.name() != Some(FILE_FIELD) {
                continue;
            }
            let filename = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await?;
            return Ok(Self {
                filename,
                content_type,
                data,
            });
        }
        Err(ValidationError::MissingFile.into())
    }
}

/// Everything a `/transcribe` request needs. Shared across requests.
#[derive(Clone)]
pub struct TranscribePipeline {
    orchestrator: JobOrchestrator,
    probe: Arc<dyn AudioProbe>,
    config: PipelineConfig,
}

impl TranscribePipeline {
    /// Create a pipeline.
    pub fn new(
        orchestrator: JobOrchestrator,
        probe: Arc<dyn AudioProbe>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            orchestrator,
            probe,
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one upload through the full pipeline and record its outcome.
    #[instrument(skip_all, fields(filename = upload.filename.as_deref().unwrap_or(""), bytes = upload.data.len()))]
    pub async fn process(&self, upload: Upload) -> Result<TranscriptionResponse, ApiError> {
        let started = Instant::now();
        let result = self.run(upload).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(ApiError::Validation(e)) => {
                metrics::counter!(UPLOADS_REJECTED_TOTAL, "reason" => e.reason()).increment(1);
                "rejected"
            }
            Err(_) => "failed",
        };
        metrics::counter!(TRANSCRIBE_REQUESTS_TOTAL, "outcome" => outcome).increment(1);
        metrics::histogram!(TRANSCRIBE_DURATION_SECONDS).record(started.elapsed().as_secs_f64());

        result
    }

    async fn run(&self, upload: Upload) -> Result<TranscriptionResponse, ApiError> {
        check_content_type(
            upload.content_type.as_deref(),
            &self.config.allowed_content_types,
        )?;

        let duration = self.measure(&upload).await?;
        check_duration(duration, self.config.max_duration_secs)?;
        metrics::histogram!(AUDIO_DURATION_SECONDS).record(duration);
        debug!(duration_secs = duration, "upload accepted");

        let transcript = self.orchestrator.run(upload.data).await?;
        let analysis = analyze(&transcript.words, duration, &self.config.analysis);
        metrics::histogram!(PRONUNCIATION_SCORE)
            .record(f64::from(analysis.pronunciation.score));

        info!(
            job_id = %transcript.id,
            score = analysis.pronunciation.score,
            wpm = analysis.pacing.wpm,
            pauses = analysis.pauses.count,
            "clip analyzed"
        );
        Ok(TranscriptionResponse::new(
            upload.filename,
            duration,
            transcript,
            analysis,
        ))
    }

    /// Probe duration on the blocking pool.
    async fn measure(&self, upload: &Upload) -> Result<f64, ApiError> {
        let probe = Arc::clone(&self.probe);
        let data = upload.data.clone();
        let mime = upload.content_type.clone().unwrap_or_default();

        let measured = tokio::task::spawn_blocking(move || probe.duration_secs(&data, &mime))
            .await
            .map_err(|e| ApiError::Internal(format!("duration probe task failed: {e}")))?;
        measured.map_err(|e| ApiError::Validation(e.into()))
    }
}
