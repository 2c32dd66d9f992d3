//! Lead Engine Server Entry Point

use std::net::SocketAddr;

use lead_engine_config::{load_settings, Settings};
use lead_engine_server::{create_router, init_metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("LEAD_ENGINE_ENV").unwrap_or_else(|_| "default".to_string());
    let settings = match load_settings(&env) {
        Ok(settings) => {
            // Tracing not yet initialized, use eprintln for early logging
            eprintln!("Loaded configuration from files (env: {env})");
            settings
        }
        Err(err) => {
            eprintln!("Warning: Failed to load config: {err}. Using defaults.");
            Settings::default()
        }
    };

    init_tracing(&settings);

    tracing::info!("Starting Lead Engine Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        environment = %env,
        sentiment_provider = ?settings.llm.provider,
        llm_configured = settings.llm.api_key.is_some(),
        "Configuration loaded"
    );

    let _metrics_handle = init_metrics();
    tracing::info!("Initialized Prometheus metrics at /metrics");

    let host: std::net::IpAddr = settings.server.host.parse()?;
    let addr = SocketAddr::new(host, settings.server.port);

    let state = AppState::from_settings(settings);
    let app = create_router(state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

fn init_tracing(settings: &Settings) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lead_engine={},tower_http=info", settings.log.level)));

    let registry = tracing_subscriber::registry().with(filter);
    if settings.log.json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
