//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use speakwell_settings::SpeakwellSettings;

/// Speech feedback server.
#[derive(Parser, Debug)]
#[command(name = "speakwell-agent", about = "Speech feedback server", version)]
pub struct Cli {
    /// Settings file (defaults to `~/.speakwell/settings.json`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Host to bind (overrides settings).
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides settings).
    #[arg(long)]
    pub port: Option<u16>,

    /// Emit JSON log lines.
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    /// Apply flags over loaded settings. Flags win over file and env.
    pub fn apply(&self, settings: &mut SpeakwellSettings) {
        if let Some(host) = &self.host {
            settings.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if self.log_json {
            settings.logging.json = true;
        }
    }
}
