use std::time::Duration;

use serde::Deserialize;

use swarp_core::{GameDescriptor, PlaceId};

/// Failure of a `/api/game-info` call, as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InvalidInput(String),
    NotFound(String),
    Internal(String),
    /// The server could not be reached or answered with something unreadable.
    Transport(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(m) | Self::NotFound(m) | Self::Internal(m) => write!(f, "{m}"),
            Self::Transport(m) => write!(f, "could not reach SWarp server: {m}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the SWarp server.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("swarp-client/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /api/game-info/{place_id}
    pub async fn game_info(&self, place_id: &PlaceId) -> Result<GameDescriptor, ApiError> {
        let url = format!("{}/api/game-info/{place_id}", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return resp
                .json::<GameDescriptor>()
                .await
                .map_err(|e| ApiError::Transport(format!("bad game info body: {e}")));
        }

        let message = match resp.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        tracing::debug!(place_id = %place_id, %status, error = %message, "Game info lookup failed");
        Err(match status.as_u16() {
            400 => ApiError::InvalidInput(message),
            404 => ApiError::NotFound(message),
            _ => ApiError::Internal(message),
        })
    }
}
