use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use serde_json::{Value, json};

use swarp_client::dispatch::RecordingDispatcher;
use swarp_client::{ApiClient, Session};
use swarp_core::test_helpers::make_game;

/// One scripted answer of the fake game-info endpoint.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
    pub delay: Duration,
}

impl Reply {
    pub fn game(name: &str) -> Self {
        Self {
            status: 200,
            body: serde_json::to_value(make_game(name)).unwrap(),
            delay: Duration::ZERO,
        }
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

struct FakeState {
    replies: HashMap<String, Reply>,
    hits: Arc<Mutex<Vec<String>>>,
}

async fn game_info_handler(
    State(fake): State<Arc<FakeState>>,
    Path(place_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    fake.hits.lock().unwrap().push(place_id.clone());
    let reply = fake
        .replies
        .get(&place_id)
        .cloned()
        .unwrap_or_else(|| Reply::error(404, "Game not found"));
    tokio::time::sleep(reply.delay).await;
    (StatusCode::from_u16(reply.status).unwrap(), Json(reply.body))
}

/// Stand-in for the SWarp server's `/api/game-info/{placeId}`.
pub struct FakeServer {
    pub addr: SocketAddr,
    hits: Arc<Mutex<Vec<String>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl FakeServer {
    pub async fn start(replies: impl IntoIterator<Item = (&'static str, Reply)>) -> Self {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let state = Arc::new(FakeState {
            replies: replies
                .into_iter()
                .map(|(id, reply)| (id.to_string(), reply))
                .collect(),
            hits: Arc::clone(&hits),
        });
        let app = Router::new()
            .route("/api/game-info/{place_id}", get(game_info_handler))
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

    /// Answers 404 for every place id.
    pub async fn empty() -> Self {
        Self::start(Vec::<(&'static str, Reply)>::new()).await
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Place ids requested so far, in arrival order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::new(&self.base_url(), Duration::from_secs(5)).unwrap()
    }

    /// A session wired to this server and a dispatcher the test can inspect.
    pub fn session(&self) -> (Session, RecordingDispatcher) {
        let dispatcher = RecordingDispatcher::new();
        let session = Session::new(self.api(), Box::new(dispatcher.clone()));
        (session, dispatcher)
    }
}
