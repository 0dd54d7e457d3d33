//! Server initialization and startup logic for assistant-relay.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use relay_channel_web::{WebRelay, WebRelayConfig, WS_PATH};
use relay_config::{Config, ConfigLoader, ConfigValidator, ValidationWarning};
use relay_openai::{AssistantApi, OpenAIAssistantClient, OpenAIError};

use crate::cli::Cli;

/// Default data directory (`~/.assistant-relay`).
pub(crate) fn relay_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".assistant-relay"))
        .unwrap_or_else(|| PathBuf::from(".assistant-relay"))
}

/// Resolve the configured log directory, falling back to `~/.assistant-relay/logs`.
pub(crate) fn resolve_log_dir(log_dir: &str) -> PathBuf {
    if log_dir.trim().is_empty() {
        relay_dir().join("logs")
    } else {
        PathBuf::from(ConfigLoader::expand_path(log_dir))
    }
}

/// Load the config file (defaults when missing), apply CLI overrides and validate.
///
/// Validation warnings are returned for logging once tracing is up.
pub(crate) fn load_config(
    cli: &Cli,
) -> Result<(Config, Vec<ValidationWarning>), Box<dyn std::error::Error>> {
    let mut config = ConfigLoader::load_or_default(&cli.config)?;
    cli.apply_overrides(&mut config);

    let warnings = ConfigValidator::validate(&config).into_result()?;
    Ok((config, warnings))
}

/// Initialize tracing with console and file output.
///
/// Log files rotate daily and the last 30 are kept.
pub(crate) fn init_tracing(log_dir: &str) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = resolve_log_dir(log_dir);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("assistant-relay")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the writer flushing for the program's lifetime.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Build the remote API client from config.
pub(crate) fn build_client(config: &Config) -> Result<OpenAIAssistantClient, OpenAIError> {
    let openai = &config.openai;
    let api_key = openai
        .resolve_api_key()
        .ok_or_else(|| OpenAIError::MissingApiKey(openai.api_key_env.clone()))?;

    if openai.request_timeout_secs == 0 {
        Ok(OpenAIAssistantClient::with_url(api_key, openai.base_url.clone()))
    } else {
        OpenAIAssistantClient::with_timeout(
            api_key,
            openai.base_url.clone(),
            Duration::from_secs(openai.request_timeout_secs),
        )
    }
}

/// Run the relay in the foreground until Ctrl-C.
pub(crate) async fn run_server(
    config: Config,
    warnings: Vec<ValidationWarning>,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting assistant-relay v{}", env!("CARGO_PKG_VERSION"));
    for warning in &warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }

    let client = build_client(&config)?;
    info!("Remote API: {} (model {})", client.base_url(), config.openai.model);

    let api: Arc<dyn AssistantApi> = Arc::new(client);
    let relay = WebRelay::new(WebRelayConfig::from_config(&config), api);
    let addr = relay.start().await?;

    info!("assistant-relay ready:");
    info!("  Web UI:     http://{}", addr);
    info!("  WebSocket:  ws://{}{}", addr, WS_PATH);
    info!("  Health:     http://{}/health", addr);

    tokio::signal::ctrl_c().await?;

    info!("Shutting down...");
    relay.stop();
    Ok(())
}
