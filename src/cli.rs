//! CLI definitions for assistant-relay.

use std::path::PathBuf;

use clap::Parser;
use relay_config::Config;

/// assistant-relay CLI.
#[derive(Parser, Debug)]
#[command(name = "assistant-relay")]
#[command(about = "WebSocket relay between a browser UI and the OpenAI Assistants API")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Server host (overrides the config file)
    #[arg(long)]
    pub host: Option<String>,

    /// Server port (overrides the config file)
    #[arg(long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config.
    pub(crate) fn apply_overrides(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
