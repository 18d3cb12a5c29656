//! # speakwell-agent
//!
//! Server binary: loads settings, installs logging and metrics, wires the
//! AssemblyAI client into the HTTP server and serves until Ctrl-C/SIGTERM.

#![deny(unsafe_code)]

mod cli;
mod logging;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use speakwell_server::{PipelineConfig, SpeakwellServer, SymphoniaProbe, TranscribePipeline};
use speakwell_settings::{ApiKey, load_settings_with_rejections, settings_path};
use speakwell_transcription::{AssemblyAiClient, JobOrchestrator};
use tokio::net::TcpListener;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let path = args.config.clone().unwrap_or_else(settings_path);
    let (mut settings, rejected) = load_settings_with_rejections(&path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))?;
    args.apply(&mut settings);

    logging::init(&settings.logging)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting speakwell");
    logging::report_rejected_overrides(&rejected);

    // Missing key is fatal before anything binds.
    let api_key = ApiKey::from_env().context("Transcription API key not configured")?;

    let metrics = speakwell_server::metrics::install_recorder()
        .context("Failed to install metrics recorder")?;

    let client = AssemblyAiClient::new(settings.transcription.base_url.clone(), api_key);
    tracing::info!(base_url = client.base_url(), "transcription client ready");

    let orchestrator = JobOrchestrator::new(Arc::new(client))
        .with_poll_interval(Duration::from_millis(
            settings.transcription.poll_interval_ms,
        ))
        .with_chunk_size(settings.transcription.chunk_size_bytes);

    let pipeline = TranscribePipeline::new(
        orchestrator,
        Arc::new(SymphoniaProbe),
        PipelineConfig::from(&settings),
    );
    let server = SpeakwellServer::new(pipeline, Some(metrics));

    let bind = (settings.server.host.as_str(), settings.server.port);
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}:{}", bind.0, bind.1))?;

    let shutdown = server.shutdown().clone();
    let signals = tokio::spawn(async move { shutdown.listen_for_signals().await });

    server.serve(listener).await.context("Server error")?;
    signals.abort();

    tracing::info!("shut down");
    Ok(())
}
