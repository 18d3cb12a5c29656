//! AssemblyAI implementation of [`TranscriptionService`].
//!
//! Endpoints (relative to the base URL):
//! - `POST /upload`: raw audio body, streamed in [`AudioChunks`] blocks;
//!   returns `{"upload_url": ...}`
//! - `POST /transcript`: `{"audio_url", "punctuate", "format_text"}`;
//!   returns `{"id": ...}`
//! - `GET /transcript/{id}`: job status payload
//!
//! Every request carries the API key in the `authorization` header. Word
//! timestamps and confidences are included by the service by default.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use speakwell_core::TranscriptResult;
use speakwell_settings::ApiKey;
use tracing::debug;

use crate::chunks::AudioChunks;
use crate::errors::{JobError, JobStage};
use crate::service::{JobId, TranscriptionService, UploadRef};

/// Public AssemblyAI v2 endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com/v2";

#[derive(Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    audio_url: &'a str,
    punctuate: bool,
    format_text: bool,
}

#[derive(Deserialize)]
struct SubmitResponse {
    id: String,
}

/// HTTP client for the AssemblyAI transcription API.
pub struct AssemblyAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: ApiKey,
}

impl AssemblyAiClient {
    /// Create a client for `base_url` with a fresh connection pool.
    pub fn new(base_url: impl Into<String>, api_key: ApiKey) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>, api_key: ApiKey) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request and turn transport failures and non-2xx responses into
    /// `stage` errors.
    async fn send(
        &self,
        stage: JobStage,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, JobError> {
        let response = request
            .header(AUTHORIZATION, self.api_key.expose())
            .send()
            .await
            .map_err(|e| transport_error(stage, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JobError::request(
                stage,
                Some(status.as_u16()),
                format!("HTTP {}: {body}", status.as_u16()),
            ));
        }
        Ok(response)
    }
}

fn transport_error(stage: JobStage, err: &reqwest::Error) -> JobError {
    JobError::request(stage, err.status().map(|s| s.as_u16()), err.to_string())
}

#[async_trait]
impl TranscriptionService for AssemblyAiClient {
    async fn upload(&self, audio: AudioChunks) -> Result<UploadRef, JobError> {
        debug!(
            bytes = audio.total_bytes(),
            chunks = audio.len(),
            "uploading audio"
        );
        let blocks = futures::stream::iter(audio.iter().map(Ok::<Bytes, std::io::Error>));
        let request = self
            .client
            .post(format!("{}/upload", self.base_url))
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(reqwest::Body::wrap_stream(blocks));

        let response = self.send(JobStage::Upload, request).await?;
        let data: UploadResponse = response
            .json()
            .await
            .map_err(|e| transport_error(JobStage::Upload, &e))?;
        Ok(UploadRef::new(data.upload_url))
    }

    async fn submit(&self, upload: &UploadRef) -> Result<JobId, JobError> {
        let body = SubmitRequest {
            audio_url: upload.as_str(),
            punctuate: true,
            format_text: true,
        };
        let request = self
            .client
            .post(format!("{}/transcript", self.base_url))
            .json(&body);

        let response = self.send(JobStage::Submission, request).await?;
        let data: SubmitResponse = response
            .json()
            .await
            .map_err(|e| transport_error(JobStage::Submission, &e))?;
        debug!(job_id = %data.id, "transcription job submitted");
        Ok(JobId::new(data.id))
    }

    async fn poll_once(&self, job: &JobId) -> Result<TranscriptResult, JobError> {
        let request = self
            .client
            .get(format!("{}/transcript/{}", self.base_url, job.as_str()));

        let response = self.send(JobStage::Poll, request).await?;
        response
            .json()
            .await
            .map_err(|e| transport_error(JobStage::Poll, &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use speakwell_core::JobStatus;
    use wiremock::matchers::{body_bytes, body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AssemblyAiClient {
        AssemblyAiClient::new(server.uri(), ApiKey::new("test-key"))
    }

    #[tokio::test]
    async fn upload_streams_all_bytes_and_returns_url() {
        let server = MockServer::start().await;
        let audio: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();

        Mock::given(method("POST"))
            .and(path("/upload"))
            .and(header("authorization", "test-key"))
            .and(body_bytes(audio.clone()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"upload_url": "https://cdn.example/abc"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let upload = client_for(&server)
            .upload(AudioChunks::new(audio, 1_024))
            .await
            .unwrap();
        assert_eq!(upload.as_str(), "https://cdn.example/abc");
    }

    #[tokio::test]
    async fn upload_non_success_is_upload_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .upload(AudioChunks::with_default_size(vec![1u8, 2, 3]))
            .await
            .unwrap_err();
        assert_matches!(err, JobError::Upload { status: Some(401), .. });
        assert!(err.message().contains("Invalid API key"));
    }

    #[tokio::test]
    async fn upload_malformed_body_is_upload_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": 1})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .upload(AudioChunks::with_default_size(vec![0u8; 4]))
            .await
            .unwrap_err();
        assert_eq!(err.stage(), JobStage::Upload);
    }

    #[tokio::test]
    async fn submit_sends_fixed_options() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transcript"))
            .and(header("authorization", "test-key"))
            .and(body_json(json!({
                "audio_url": "https://cdn.example/abc",
                "punctuate": true,
                "format_text": true
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "job-42", "status": "queued"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let job = client_for(&server)
            .submit(&UploadRef::new("https://cdn.example/abc"))
            .await
            .unwrap();
        assert_eq!(job, JobId::new("job-42"));
    }

    #[tokio::test]
    async fn submit_non_success_is_submission_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transcript"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad audio_url"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .submit(&UploadRef::new("nope"))
            .await
            .unwrap_err();
        assert_matches!(err, JobError::Submission { status: Some(400), .. });
    }

    #[tokio::test]
    async fn poll_once_parses_completed_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transcript/job-42"))
            .and(header("authorization", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "job-42",
                "status": "completed",
                "text": "Hello world.",
                "words": [
                    {"text": "Hello", "start": 10, "end": 400, "confidence": 0.98},
                    {"text": "world.", "start": 450, "end": 900, "confidence": 0.91}
                ]
            })))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .poll_once(&JobId::new("job-42"))
            .await
            .unwrap();
        assert_eq!(result.status, JobStatus::Completed);
        assert_eq!(result.text, "Hello world.");
        assert_eq!(result.words.len(), 2);
    }

    #[tokio::test]
    async fn poll_once_non_success_is_poll_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transcript/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .poll_once(&JobId::new("missing"))
            .await
            .unwrap_err();
        assert_matches!(err, JobError::Poll { status: Some(404), .. });
    }

    #[tokio::test]
    async fn unreachable_service_is_transport_error() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let client = AssemblyAiClient::new(uri, ApiKey::new("k"));
        let err = client.submit(&UploadRef::new("x")).await.unwrap_err();
        assert_matches!(err, JobError::Submission { status: None, .. });
    }

    #[test]
    fn trailing_slash_trimmed() {
        let client = AssemblyAiClient::new("http://localhost:1/v2/", ApiKey::new("k"));
        assert_eq!(client.base_url(), "http://localhost:1/v2");
    }
}
