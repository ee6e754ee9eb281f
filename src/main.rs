use anyhow::{Context, Result};
use clap::Parser;
use cooktales_ai::api::{self, AppState};
use cooktales_ai::config::AppConfig;
use cooktales_ai::food::SuggestionGenerator;
use cooktales_ai::providers::openai::OpenAIProvider;
use dotenv::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "AI recipe suggestion backend", long_about = None)]
struct Args {
    #[arg(short, long)]
    api_key: Option<String>,

    #[arg(long)]
    model: Option<String>,

    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cooktales_ai=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();

    // Flags take precedence over the environment
    let config = AppConfig::from_env_with_overrides(|key| match key {
        "OPENAI_API_KEY" => args.api_key.clone(),
        "OPENAI_CHAT_MODEL" => args.model.clone(),
        "PORT" => args.port.map(|p| p.to_string()),
        _ => None,
    })?;

    run_api_server(config).await
}

async fn run_api_server(config: AppConfig) -> Result<()> {
    let provider = OpenAIProvider::new(
        config.api_key.clone(),
        config.model.clone(),
        config.api_url.clone(),
        config.request_timeout,
    )
    .context("Failed to build completion client")?;

    let generator = SuggestionGenerator::new(Arc::new(provider), config.suggestion_settings());
    let state = AppState::new(generator, &config.service_name);
    let app = api::create_api(state, &config.allowed_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(
        %addr,
        model = %config.model,
        timeout_secs = config.request_timeout.as_secs(),
        "AI backend running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
