use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use monconsole_api::config::{LogFormat, ServerConfig};
use monconsole_api::router::build_app_router;
use monconsole_api::state::AppState;
use monconsole_client::{ClientConfig, ConsoleApi};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "monconsole_api=debug,monconsole_client=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env();
    init_tracing(config.log_format);
    tracing::info!(
        host = %config.host,
        port = config.port,
        backend = %config.backend_url,
        page_size = config.default_page_size,
        "Loaded server configuration"
    );

    let state = build_state(&config);
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("HOST must be an IP address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Console API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// One backend client serves records, imports and session lookups.
fn build_state(config: &ServerConfig) -> AppState {
    let client_config = ClientConfig::new(config.backend_url.clone())
        .with_token(config.backend_token.clone())
        .with_timeout(Duration::from_secs(config.request_timeout_secs));
    let backend = Arc::new(ConsoleApi::new(client_config).expect("Invalid BACKEND_URL"));

    AppState {
        records: backend.clone(),
        bulk: backend.clone(),
        identity: backend,
        config: Arc::new(config.clone()),
    }
}

/// Resolve on SIGINT or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
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
        () = ctrl_c => tracing::info!("SIGINT received, shutting down"),
        () = terminate => tracing::info!("SIGTERM received, shutting down"),
    }
}
