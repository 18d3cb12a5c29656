//! Upload → submit → poll state machine for one transcription job.
//!
//! ```text
//! Uploading ──upload──▶ Uploaded ──submit──▶ Submitted ──query──▶ Polling ─┐
//!     │                    │                    │                   ▲ wait │
//!     ▼                    ▼                    ▼                   └query─┘
//!   Failed               Failed        Completed | Failed     Completed | Failed
//! ```
//!
//! Polling has no attempt cap and no timeout: a job that never leaves
//! `queued`/`processing` is polled until the caller drops the future. Wrap
//! [`JobOrchestrator::run`] in `tokio::time::timeout` to bound it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use speakwell_core::{JobStatus, TranscriptResult};
use tracing::{debug, info, instrument, warn};

use crate::chunks::{AudioChunks, DEFAULT_CHUNK_SIZE};
use crate::clock::{Sleeper, TokioSleeper};
use crate::errors::JobError;
use crate::metric_names;
use crate::service::{JobId, TranscriptionService, UploadRef};

/// Wait between status queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Where a job is in its lifecycle.
#[derive(Debug)]
pub enum JobState {
    /// Audio not yet sent.
    Uploading {
        /// Blocks to upload.
        audio: AudioChunks,
    },
    /// Audio stored by the service; no job yet.
    Uploaded {
        /// Reference to the stored audio.
        upload: UploadRef,
    },
    /// Job created; status not yet queried.
    Submitted {
        /// Service job id.
        job_id: JobId,
    },
    /// Last status query was non-terminal; wait, then query again.
    Polling {
        /// Service job id.
        job_id: JobId,
        /// Status queries sent so far.
        queries: u32,
        /// Status reported by the last query.
        last_status: JobStatus,
    },
    /// Job finished successfully.
    Completed(TranscriptResult),
    /// Job failed at some stage.
    Failed(JobError),
}

impl JobState {
    /// Whether no further steps are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Failed(_))
    }

    /// Short state name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uploading { .. } => "uploading",
            Self::Uploaded { .. } => "uploaded",
            Self::Submitted { .. } => "submitted",
            Self::Polling { .. } => "polling",
            Self::Completed(_) => "completed",
            Self::Failed(_) => "failed",
        }
    }
}

/// Runs transcription jobs against a [`TranscriptionService`].
///
/// Holds no per-job state, so one instance can drive any number of
/// concurrent jobs.
#[derive(Clone)]
pub struct JobOrchestrator {
    service: Arc<dyn TranscriptionService>,
    sleeper: Arc<dyn Sleeper>,
    poll_interval: Duration,
    chunk_size: usize,
}

impl JobOrchestrator {
    /// Orchestrator with the tokio timer, 2 s polling and 5 MiB chunks.
    pub fn new(service: Arc<dyn TranscriptionService>) -> Self {
        Self {
            service,
            sleeper: Arc::new(TokioSleeper),
            poll_interval: DEFAULT_POLL_INTERVAL,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Replace the wait implementation.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Set the wait between status queries.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the upload block size.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Configured wait between status queries.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Initial state for `audio`.
    pub fn start(&self, audio: impl Into<Bytes>) -> JobState {
        JobState::Uploading {
            audio: AudioChunks::new(audio, self.chunk_size),
        }
    }

    /// Upload, submit and poll until the job completes or fails.
    #[instrument(skip_all, fields(bytes = audio.len()))]
    pub async fn run(&self, audio: Bytes) -> Result<TranscriptResult, JobError> {
        let started = Instant::now();
        metrics::counter!(metric_names::JOBS_STARTED_TOTAL).increment(1);

        let mut state = self.start(audio);
        let outcome = loop {
            match state {
                JobState::Completed(result) => break Ok(result),
                JobState::Failed(err) => break Err(err),
                pending => {
                    let from = pending.name();
                    state = self.step(pending).await;
                    debug!(from, to = state.name(), "job state transition");
                }
            }
        };

        metrics::histogram!(metric_names::JOB_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());

        match &outcome {
            Ok(result) => {
                metrics::counter!(
                    metric_names::JOBS_FINISHED_TOTAL,
                    "outcome" => "completed",
                    "stage" => "none"
                )
                .increment(1);
                info!(job_id = %result.id, words = result.words.len(), "transcription completed");
            }
            Err(err) => {
                metrics::counter!(
                    metric_names::JOBS_FINISHED_TOTAL,
                    "outcome" => "failed",
                    "stage" => err.stage().as_str()
                )
                .increment(1);
                warn!(stage = err.stage().as_str(), error = %err, "transcription failed");
            }
        }
        outcome
    }

    /// Perform one transition. Terminal states are returned unchanged.
    pub async fn step(&self, state: JobState) -> JobState {
        match state {
            JobState::Uploading { audio } => match self.service.upload(audio).await {
                Ok(upload) => JobState::Uploaded { upload },
                Err(err) => JobState::Failed(err),
            },
            JobState::Uploaded { upload } => match self.service.submit(&upload).await {
                Ok(job_id) => JobState::Submitted { job_id },
                Err(err) => JobState::Failed(err),
            },
            JobState::Submitted { job_id } => self.query(job_id, 0).await,
            JobState::Polling {
                job_id, queries, ..
            } => {
                self.sleeper.sleep(self.poll_interval).await;
                self.query(job_id, queries).await
            }
            terminal @ (JobState::Completed(_) | JobState::Failed(_)) => terminal,
        }
    }

    async fn query(&self, job_id: JobId, queries_so_far: u32) -> JobState {
        metrics::counter!(metric_names::STATUS_QUERIES_TOTAL).increment(1);
        let queries = queries_so_far + 1;

        let result = match self.service.poll_once(&job_id).await {
            Ok(result) => result,
            Err(err) => return JobState::Failed(err),
        };

        match result.status {
            JobStatus::Completed => JobState::Completed(result),
            JobStatus::Error => JobState::Failed(JobError::Transcription {
                message: result
                    .error_message
                    .unwrap_or_else(|| "unknown error".to_string()),
            }),
            status @ (JobStatus::Queued | JobStatus::Processing) => {
                debug!(%job_id, %status, queries, "job not finished");
                JobState::Polling {
                    job_id,
                    queries,
                    last_status: status,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use speakwell_core::Word;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Service that replays scripted status payloads.
    struct ScriptedService {
        upload: Mutex<Option<Result<UploadRef, JobError>>>,
        submit: Mutex<Option<Result<JobId, JobError>>>,
        statuses: Mutex<VecDeque<Result<TranscriptResult, JobError>>>,
        uploaded_bytes: Mutex<Vec<u8>>,
        uploaded_chunks: AtomicU32,
        queries: AtomicU32,
    }

    impl ScriptedService {
        fn new(statuses: Vec<Result<TranscriptResult, JobError>>) -> Self {
            Self {
                upload: Mutex::new(Some(Ok(UploadRef::new("https://cdn/audio")))),
                submit: Mutex::new(Some(Ok(JobId::new("job-1")))),
                statuses: Mutex::new(statuses.into()),
                uploaded_bytes: Mutex::new(Vec::new()),
                uploaded_chunks: AtomicU32::new(0),
                queries: AtomicU32::new(0),
            }
        }

        fn failing_upload(err: JobError) -> Self {
            let svc = Self::new(vec![]);
            *svc.upload.lock().unwrap() = Some(Err(err));
            svc
        }

        fn failing_submit(err: JobError) -> Self {
            let svc = Self::new(vec![]);
            *svc.submit.lock().unwrap() = Some(Err(err));
            svc
        }

        fn queries(&self) -> u32 {
            self.queries.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TranscriptionService for ScriptedService {
        async fn upload(&self, audio: AudioChunks) -> Result<UploadRef, JobError> {
            for chunk in &audio {
                let _ = self.uploaded_chunks.fetch_add(1, Ordering::SeqCst);
                self.uploaded_bytes.lock().unwrap().extend_from_slice(&chunk);
            }
            self.upload.lock().unwrap().take().expect("upload called once")
        }

        async fn submit(&self, upload: &UploadRef) -> Result<JobId, JobError> {
            assert_eq!(upload.as_str(), "https://cdn/audio");
            self.submit.lock().unwrap().take().expect("submit called once")
        }

        async fn poll_once(&self, job: &JobId) -> Result<TranscriptResult, JobError> {
            assert_eq!(job.as_str(), "job-1");
            let _ = self.queries.fetch_add(1, Ordering::SeqCst);
            self.statuses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no more scripted statuses")
        }
    }

    /// Records requested waits and returns immediately.
    #[derive(Default)]
    struct RecordingSleeper {
        waits: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.waits.lock().unwrap().push(duration);
        }
    }

    fn snapshot(status: JobStatus) -> Result<TranscriptResult, JobError> {
        Ok(TranscriptResult {
            id: "job-1".into(),
            status,
            text: String::new(),
            words: vec![],
            error_message: None,
        })
    }

    fn completed() -> Result<TranscriptResult, JobError> {
        Ok(TranscriptResult {
            id: "job-1".into(),
            status: JobStatus::Completed,
            text: "Hello there.".into(),
            words: vec![
                Word::new("Hello", 0, 300, 0.95),
                Word::new("there.", 350, 700, 0.88),
            ],
            error_message: None,
        })
    }

    fn failed(message: &str) -> Result<TranscriptResult, JobError> {
        Ok(TranscriptResult {
            id: "job-1".into(),
            status: JobStatus::Error,
            text: String::new(),
            words: vec![],
            error_message: Some(message.into()),
        })
    }

    fn orchestrator(
        service: Arc<ScriptedService>,
        sleeper: Arc<RecordingSleeper>,
    ) -> JobOrchestrator {
        JobOrchestrator::new(service).with_sleeper(sleeper)
    }

    #[tokio::test]
    async fn processing_processing_completed() {
        let service = Arc::new(ScriptedService::new(vec![
            snapshot(JobStatus::Processing),
            snapshot(JobStatus::Processing),
            completed(),
        ]));
        let sleeper = Arc::new(RecordingSleeper::default());

        let result = orchestrator(service.clone(), sleeper.clone())
            .run(Bytes::from_static(b"RIFF...."))
            .await
            .unwrap();

        assert_eq!(result.text, "Hello there.");
        assert_eq!(result.words.len(), 2);
        assert_eq!(service.queries(), 3);
        assert_eq!(
            *sleeper.waits.lock().unwrap(),
            [Duration::from_secs(2), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn immediate_completion_never_sleeps() {
        let service = Arc::new(ScriptedService::new(vec![completed()]));
        let sleeper = Arc::new(RecordingSleeper::default());

        let _ = orchestrator(service.clone(), sleeper.clone())
            .run(Bytes::from_static(b"abc"))
            .await
            .unwrap();

        assert_eq!(service.queries(), 1);
        assert!(sleeper.waits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn error_status_stops_polling_with_service_message() {
        let service = Arc::new(ScriptedService::new(vec![
            snapshot(JobStatus::Queued),
            failed("Transcoding failed: unsupported codec"),
            completed(),
        ]));
        let sleeper = Arc::new(RecordingSleeper::default());

        let err = orchestrator(service.clone(), sleeper.clone())
            .run(Bytes::from_static(b"abc"))
            .await
            .unwrap_err();

        assert_matches!(
            err,
            JobError::Transcription { ref message } if message == "Transcoding failed: unsupported codec"
        );
        assert_eq!(service.queries(), 2);
        assert_eq!(sleeper.waits.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn error_status_without_message() {
        let service = Arc::new(ScriptedService::new(vec![Ok(TranscriptResult {
            id: "job-1".into(),
            status: JobStatus::Error,
            text: String::new(),
            words: vec![],
            error_message: None,
        })]));
        let err = orchestrator(service, Arc::default())
            .run(Bytes::from_static(b"abc"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "unknown error");
    }

    #[tokio::test]
    async fn upload_failure_skips_submit_and_poll() {
        let service = Arc::new(ScriptedService::failing_upload(JobError::request(
            crate::JobStage::Upload,
            Some(413),
            "too large",
        )));
        let err = orchestrator(service.clone(), Arc::default())
            .run(Bytes::from_static(b"abc"))
            .await
            .unwrap_err();

        assert_matches!(err, JobError::Upload { status: Some(413), .. });
        assert!(service.submit.lock().unwrap().is_some());
        assert_eq!(service.queries(), 0);
    }

    #[tokio::test]
    async fn submit_failure_skips_poll() {
        let service = Arc::new(ScriptedService::failing_submit(JobError::request(
            crate::JobStage::Submission,
            Some(500),
            "oops",
        )));
        let err = orchestrator(service.clone(), Arc::default())
            .run(Bytes::from_static(b"abc"))
            .await
            .unwrap_err();

        assert_matches!(err, JobError::Submission { .. });
        assert_eq!(service.queries(), 0);
    }

    #[tokio::test]
    async fn poll_failure_propagates_unmodified() {
        let service = Arc::new(ScriptedService::new(vec![
            snapshot(JobStatus::Processing),
            Err(JobError::request(crate::JobStage::Poll, Some(503), "unavailable")),
        ]));
        let err = orchestrator(service.clone(), Arc::default())
            .run(Bytes::from_static(b"abc"))
            .await
            .unwrap_err();

        assert_matches!(err, JobError::Poll { status: Some(503), .. });
        assert_eq!(service.queries(), 2);
    }

    #[tokio::test]
    async fn audio_uploaded_in_configured_chunks() {
        let service = Arc::new(ScriptedService::new(vec![completed()]));
        let audio: Vec<u8> = (0..100u8).collect();

        let _ = orchestrator(service.clone(), Arc::default())
            .with_chunk_size(30)
            .run(Bytes::from(audio.clone()))
            .await
            .unwrap();

        assert_eq!(service.uploaded_chunks.load(Ordering::SeqCst), 4);
        assert_eq!(*service.uploaded_bytes.lock().unwrap(), audio);
    }

    #[tokio::test]
    async fn step_walks_each_state() {
        let service = Arc::new(ScriptedService::new(vec![
            snapshot(JobStatus::Queued),
            completed(),
        ]));
        let orch = orchestrator(service, Arc::default());

        let state = orch.start(Bytes::from_static(b"abc"));
        assert_eq!(state.name(), "uploading");
        let state = orch.step(state).await;
        assert_matches!(state, JobState::Uploaded { .. });
        let state = orch.step(state).await;
        assert_matches!(state, JobState::Submitted { ref job_id } if job_id.as_str() == "job-1");
        let state = orch.step(state).await;
        assert_matches!(
            state,
            JobState::Polling { queries: 1, last_status: JobStatus::Queued, .. }
        );
        let state = orch.step(state).await;
        assert!(state.is_terminal());
        let state = orch.step(state).await;
        assert_matches!(state, JobState::Completed(_));
    }

    #[tokio::test(start_paused = true)]
    async fn real_sleeper_spaces_queries_by_interval() {
        let service = Arc::new(ScriptedService::new(vec![
            snapshot(JobStatus::Processing),
            snapshot(JobStatus::Processing),
            completed(),
        ]));
        let start = tokio::time::Instant::now();

        let _ = JobOrchestrator::new(service.clone())
            .run(Bytes::from_static(b"abc"))
            .await
            .unwrap();

        assert_eq!(service.queries(), 3);
        assert!(start.elapsed() >= Duration::from_secs(4));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn custom_poll_interval() {
        let service = Arc::new(ScriptedService::new(vec![
            snapshot(JobStatus::Queued),
            completed(),
        ]));
        let sleeper = Arc::new(RecordingSleeper::default());

        let orch = orchestrator(service, sleeper.clone())
            .with_poll_interval(Duration::from_millis(250));
        assert_eq!(orch.poll_interval(), Duration::from_millis(250));
        let _ = orch.run(Bytes::from_static(b"abc")).await.unwrap();

        assert_eq!(*sleeper.waits.lock().unwrap(), [Duration::from_millis(250)]);
    }
}
