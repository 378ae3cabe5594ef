use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use symptom_core::{CompletionClient, CompletionClientRef, OpenAIClient};
use symptom_relay::config::AppConfig;
use symptom_relay::feedback::{FeedbackStoreRef, InMemoryFeedbackStore};
use symptom_relay::http_server::{self, AppState};
use symptom_relay::TriageCoordinator;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "relay-daemon", about = "Symptom-triage chat relay", version)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP server address
    #[arg(long, env = "RELAY_HTTP_ADDR")]
    http_addr: Option<SocketAddr>,

    /// Origin allowed by CORS
    #[arg(long, env = "RELAY_ALLOWED_ORIGIN")]
    allowed_origin: Option<String>,

    /// Completion model to use
    #[arg(short = 'o', long)]
    model: Option<String>,

    /// Base URL of the OpenAI-compatible completion service
    #[arg(long)]
    base_url: Option<String>,

    /// TOML file replacing the built-in keyword table
    #[arg(long)]
    keyword_file: Option<PathBuf>,

    /// Include error traces in /check error responses
    #[arg(long)]
    expose_trace: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RELAY_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)))
        .init();

    info!("Starting symptom relay");

    let mut config = match &args.config {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => AppConfig::load_from_default().context("Failed to load configuration")?,
    };
    config.apply_env();

    if let Some(addr) = args.http_addr {
        config.http_addr = addr;
    }
    if let Some(origin) = args.allowed_origin {
        config.allowed_origin = origin;
    }
    if let Some(model) = args.model {
        config.model.model_name = Some(model);
    }
    if let Some(base_url) = args.base_url {
        config.model.base_url = Some(base_url);
    }
    if let Some(keyword_file) = args.keyword_file {
        config.keyword_file = Some(keyword_file);
    }
    config.expose_trace |= args.expose_trace;

    let library = Arc::new(config.keyword_library().context("Failed to load keyword library")?);
    info!(conditions = library.len(), "Loaded keyword library");

    let client: CompletionClientRef = match OpenAIClient::new(&config.model) {
        Ok(client) => {
            info!(model = %client.model_name(), "Initialized completion client");
            Arc::new(client)
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize completion client");
            return Err(anyhow::anyhow!("Failed to initialize completion client: {}", e));
        }
    };

    if config.expose_trace {
        info!("Error traces are exposed in /check responses");
    }

    let feedback: FeedbackStoreRef = Arc::new(InMemoryFeedbackStore::new());
    let state = AppState::new(
        TriageCoordinator::new(client, library),
        feedback,
        config.expose_trace,
    );

    http_server::run_server(state, &config.allowed_origin, config.http_addr).await?;

    info!("Symptom relay shutting down");
    Ok(())
}
