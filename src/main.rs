//! assistant-relay
//!
//! Serves a browser UI and relays its WebSocket requests to the OpenAI
//! Assistants API.

mod cli;
mod server;

use clap::Parser;

use crate::cli::Cli;
use crate::server::{init_tracing, load_config, run_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (config, warnings) = load_config(&cli)?;
    init_tracing(&config.server.log_dir)?;

    run_server(config, warnings).await
}
