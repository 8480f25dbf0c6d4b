pub mod api;
pub mod config;
pub mod error;
pub mod health;
pub mod resolver;
pub mod state;

use std::path::Path;

use axum::Router;
use axum::http::Method;
use axum::routing::get;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use config::ServerConfig;
use state::AppState;

/// Build the Axum router and application state from a config.
pub fn build_app(config: ServerConfig) -> Result<(Router<()>, AppState), reqwest::Error> {
    let web_root = config.web_root.clone();
    let state = AppState::new(&config)?;

    let api_routes = Router::new().route("/game-info/{place_id}", get(api::get_game_info));

    // Unknown paths get index.html so client-side routes survive a reload.
    let index = Path::new(&web_root).join("index.html");
    let static_files = ServeDir::new(&web_root).fallback(ServeFile::new(index));

    let app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes)
        .fallback_service(static_files)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    Ok((app, state))
}

/// Any origin may call the API.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}
