use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use serde_json::{Value, json};

use swarp_server::build_app;
use swarp_server::config::{ServerConfig, UpstreamConfig};

pub const UNIVERSE_ID: u64 = 4711;
pub const ICON_URL: &str = "https://tr.rbxcdn.com/180DAY-slug-race/512/512/Image/Png/noFilter";

/// How the fake catalog answers each of its three endpoints.
#[derive(Debug, Clone)]
pub struct CatalogScript {
    pub universe_status: u16,
    pub universe_id: Option<u64>,
    pub universe_delay: Duration,
    pub games_status: u16,
    pub games: Vec<Value>,
    pub icon_status: u16,
    pub icon_url: Option<String>,
}

impl Default for CatalogScript {
    fn default() -> Self {
        Self {
            universe_status: 200,
            universe_id: Some(UNIVERSE_ID),
            universe_delay: Duration::ZERO,
            games_status: 200,
            games: vec![sample_game()],
            icon_status: 200,
            icon_url: Some(ICON_URL.to_string()),
        }
    }
}

/// A game record shaped like the Roblox games API returns it.
pub fn sample_game() -> Value {
    json!({
        "id": UNIVERSE_ID,
        "rootPlaceId": 130452706173960_u64,
        "name": "Slug Race",
        "description": "Race slugs across the moon",
        "sourceName": "Slug Race",
        "creator": {
            "id": 7,
            "name": "Slugmoon",
            "type": "Group",
            "isRNVAccount": false,
            "hasVerifiedBadge": true
        },
        "price": null,
        "playing": 120,
        "visits": 98000,
        "maxPlayers": 20
    })
}

/// Request counters and captured query strings.
#[derive(Default)]
pub struct CatalogHits {
    pub universe: AtomicUsize,
    pub games: AtomicUsize,
    pub icons: AtomicUsize,
    pub last_place_id: Mutex<Option<String>>,
    pub last_games_query: Mutex<HashMap<String, String>>,
    pub last_icons_query: Mutex<HashMap<String, String>>,
}

impl CatalogHits {
    pub fn total(&self) -> usize {
        self.universe.load(Ordering::SeqCst)
            + self.games.load(Ordering::SeqCst)
            + self.icons.load(Ordering::SeqCst)
    }
}

struct FakeState {
    script: CatalogScript,
    hits: Arc<CatalogHits>,
}

/// Stand-in for apis/games/thumbnails.roblox.com on one local port.
pub struct FakeCatalog {
    pub addr: SocketAddr,
    pub hits: Arc<CatalogHits>,
    _handle: tokio::task::JoinHandle<()>,
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap()
}

async fn universe_handler(
    State(fake): State<Arc<FakeState>>,
    Path(place_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    fake.hits.universe.fetch_add(1, Ordering::SeqCst);
    *fake.hits.last_place_id.lock().unwrap() = Some(place_id);
    tokio::time::sleep(fake.script.universe_delay).await;
    (
        status(fake.script.universe_status),
        Json(json!({ "universeId": fake.script.universe_id })),
    )
}

async fn games_handler(
    State(fake): State<Arc<FakeState>>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    fake.hits.games.fetch_add(1, Ordering::SeqCst);
    *fake.hits.last_games_query.lock().unwrap() = query;
    (
        status(fake.script.games_status),
        Json(json!({ "data": fake.script.games })),
    )
}

async fn icons_handler(
    State(fake): State<Arc<FakeState>>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    fake.hits.icons.fetch_add(1, Ordering::SeqCst);
    *fake.hits.last_icons_query.lock().unwrap() = query;
    let data = match &fake.script.icon_url {
        Some(url) => json!([{
            "targetId": UNIVERSE_ID,
            "state": "Completed",
            "imageUrl": url,
            "version": "TN3"
        }]),
        None => json!([]),
    };
    (status(fake.script.icon_status), Json(json!({ "data": data })))
}

impl FakeCatalog {
    pub async fn start(script: CatalogScript) -> Self {
        let hits = Arc::new(CatalogHits::default());
        let state = Arc::new(FakeState {
            script,
            hits: Arc::clone(&hits),
        });
        let app = Router::new()
            .route(
                "/universes/v1/places/{place_id}/universe",
                get(universe_handler),
            )
            .route("/v1/games", get(games_handler))
            .route("/v1/games/icons", get(icons_handler))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            hits,
            _handle: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Base URL of a port nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub struct TestServer {
    pub addr: SocketAddr,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start the app against a fake catalog running `script`.
    pub async fn with_catalog(script: CatalogScript) -> (Self, FakeCatalog) {
        let catalog = FakeCatalog::start(script).await;
        let upstream = UpstreamConfig::with_single_host(&catalog.base_url());
        let server = Self::with_upstream(upstream).await;
        (server, catalog)
    }

    pub async fn with_upstream(upstream: UpstreamConfig) -> Self {
        Self::from_config(ServerConfig {
            listen_addr: "127.0.0.1:0".to_string(),
            upstream,
            ..ServerConfig::default()
        })
        .await
    }

    pub async fn from_config(config: ServerConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (app, _state) = build_app(config).unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            _shutdown: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn game_info_url(&self, place_id: &str) -> String {
        format!("{}/api/game-info/{place_id}", self.base_url())
    }
}
