//! Metric names recorded by the orchestrator.

/// Jobs started (counter).
pub const JOBS_STARTED_TOTAL: &str = "transcription_jobs_started_total";
/// Jobs finished (counter, labels: outcome, stage).
pub const JOBS_FINISHED_TOTAL: &str = "transcription_jobs_finished_total";
/// Status queries sent (counter).
pub const STATUS_QUERIES_TOTAL: &str = "transcription_status_queries_total";
/// Wall time from upload start to terminal state (histogram, seconds).
pub const JOB_DURATION_SECONDS: &str = "transcription_job_duration_seconds";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_are_snake_case() {
        for name in [
            JOBS_STARTED_TOTAL,
            JOBS_FINISHED_TOTAL,
            STATUS_QUERIES_TOTAL,
            JOB_DURATION_SECONDS,
        ] {
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "metric name '{name}' must be snake_case"
            );
        }
    }
}
