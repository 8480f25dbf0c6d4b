use tracing_subscriber::EnvFilter;

use swarp_server::build_app;
use swarp_server::config::ServerConfig;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("SWARP_LOG_JSON").is_ok_and(|v| v == "1" || v == "true");
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = ServerConfig::load();
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {e}");
        std::process::exit(1);
    }
    let listen_addr = config.listen_addr.clone();

    let (app, _state) = match build_app(config) {
        Ok(built) => built,
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {e}");
            std::process::exit(1);
        },
    };

    let listener = match tokio::net::TcpListener::bind(&listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %listen_addr, "Failed to bind: {e}");
            std::process::exit(1);
        },
    };

    tracing::info!(addr = %listen_addr, "SWarp server listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}
