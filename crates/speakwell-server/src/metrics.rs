//! Prometheus metrics recorder and `/metrics` rendering.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Install the Prometheus metrics recorder (global).
///
/// Returns the handle used to render `/metrics`. Call once at startup before
/// any metrics are recorded; a second install fails.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("prometheus metrics recorder installed");
    Ok(handle)
}

/// Render Prometheus text format from the installed recorder.
pub fn render(handle: &PrometheusHandle) -> String {
    handle.render()
}

// Metric name constants to avoid typos across crates.

/// `/transcribe` requests total (counter, labels: outcome).
pub const TRANSCRIBE_REQUESTS_TOTAL: &str = "transcribe_requests_total";
/// Uploads rejected by validation (counter, labels: reason).
pub const UPLOADS_REJECTED_TOTAL: &str = "uploads_rejected_total";
/// Accepted clip duration seconds (histogram).
pub const AUDIO_DURATION_SECONDS: &str = "audio_duration_seconds";
/// End-to-end `/transcribe` latency seconds (histogram).
pub const TRANSCRIBE_DURATION_SECONDS: &str = "transcribe_duration_seconds";
/// Pronunciation score of completed requests (histogram).
pub const PRONUNCIATION_SCORE: &str = "pronunciation_score";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_unattached_recorder() {
        // Build a recorder + handle (no global install to avoid test conflicts).
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            metrics::counter!(TRANSCRIBE_REQUESTS_TOTAL, "outcome" => "ok").increment(2);
        });

        let output = render(&handle);
        assert!(output.contains("transcribe_requests_total"), "{output}");
        assert!(output.contains("outcome=\"ok\""), "{output}");
    }

    #[test]
    fn metric_constants_are_snake_case() {
        let names = [
            TRANSCRIBE_REQUESTS_TOTAL,
            UPLOADS_REJECTED_TOTAL,
            AUDIO_DURATION_SECONDS,
            TRANSCRIBE_DURATION_SECONDS,
            PRONUNCIATION_SCORE,
        ];
        for name in names {
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "metric name '{name}' must be snake_case"
            );
        }
    }
}
