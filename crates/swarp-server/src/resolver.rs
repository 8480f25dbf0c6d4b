//! Place id → game metadata, by chaining three Roblox catalog lookups.
//!
//! The universe and game lookups are mandatory and short-circuit with `?`.
//! The icon lookup is best-effort and only ever produces an `Option`.

use serde::Deserialize;

use swarp_core::{Creator, GameDescriptor, PlaceId, ResolveError};

use crate::config::UpstreamConfig;
use crate::error::INTERNAL_ERROR_MESSAGE;

/// `GET /universes/v1/places/{placeId}/universe`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UniverseResponse {
    universe_id: Option<u64>,
}

/// `GET /v1/games?universeIds=`
#[derive(Debug, Deserialize)]
struct GamesResponse {
    #[serde(default)]
    data: Vec<CatalogGame>,
}

#[derive(Debug, Deserialize)]
struct CatalogGame {
    name: String,
    #[serde(default)]
    description: Option<String>,
    creator: Creator,
    #[serde(default)]
    playing: Option<u64>,
    #[serde(default)]
    visits: Option<u64>,
}

/// `GET /v1/games/icons?universeIds=`
#[derive(Debug, Deserialize)]
struct IconsResponse {
    #[serde(default)]
    data: Vec<IconEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IconEntry {
    #[serde(default)]
    image_url: Option<String>,
}

/// Resolves place ids against the Roblox catalog.
pub struct CatalogResolver {
    client: reqwest::Client,
    upstream: UpstreamConfig,
}

fn internal(context: &str, err: impl std::fmt::Display) -> ResolveError {
    tracing::error!(context, error = %err, "Catalog lookup failed unexpectedly");
    ResolveError::Internal(INTERNAL_ERROR_MESSAGE.to_string())
}

impl CatalogResolver {
    pub fn new(upstream: UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(upstream.user_agent.clone())
            .timeout(upstream.timeout())
            .build()?;
        Ok(Self { client, upstream })
    }

    /// Resolve a raw place id string to display metadata.
    pub async fn resolve(&self, raw_place_id: &str) -> Result<GameDescriptor, ResolveError> {
        let place_id = PlaceId::parse(raw_place_id)
            .map_err(|_| ResolveError::InvalidInput("Invalid place ID".to_string()))?;

        let universe_id = self.universe_id(&place_id).await?;
        let game = self.game_record(universe_id).await?;
        let icon_url = self.icon_url(universe_id).await;

        tracing::debug!(
            place_id = %place_id,
            universe_id,
            has_icon = icon_url.is_some(),
            "Resolved game info"
        );

        Ok(GameDescriptor {
            name: game.name,
            description: game.description,
            creator: game.creator,
            concurrent_players: game.playing.unwrap_or(0),
            total_visits: game.visits.unwrap_or(0),
            icon_url,
        })
    }

    async fn universe_id(&self, place_id: &PlaceId) -> Result<u64, ResolveError> {
        let url = format!(
            "{}/universes/v1/places/{place_id}/universe",
            self.upstream.universes_base_url
        );
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| internal("universe lookup", e))?;

        if !resp.status().is_success() {
            tracing::error!(
                place_id = %place_id,
                status = %resp.status(),
                "Roblox Universe API error"
            );
            return Err(ResolveError::NotFound(
                "Game not found or API issue (Universe API)".to_string(),
            ));
        }

        let body: UniverseResponse = resp
            .json()
            .await
            .map_err(|e| internal("universe response", e))?;
        body.universe_id.ok_or_else(|| {
            tracing::warn!(place_id = %place_id, "Place has no universe");
            ResolveError::NotFound("Game not found".to_string())
        })
    }

    async fn game_record(&self, universe_id: u64) -> Result<CatalogGame, ResolveError> {
        let url = format!(
            "{}/v1/games?universeIds={universe_id}",
            self.upstream.games_base_url
        );
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| internal("games lookup", e))?;

        if !resp.status().is_success() {
            tracing::error!(
                universe_id,
                status = %resp.status(),
                "Roblox Games API error"
            );
            return Err(ResolveError::NotFound(
                "Game details not found or API issue (Games API)".to_string(),
            ));
        }

        let body: GamesResponse = resp
            .json()
            .await
            .map_err(|e| internal("games response", e))?;
        body.data
            .into_iter()
            .next()
            .ok_or_else(|| ResolveError::NotFound("Game not found".to_string()))
    }

    /// Best-effort icon lookup. Every failure is logged and becomes `None`.
    async fn icon_url(&self, universe_id: u64) -> Option<String> {
        let url = format!(
            "{}/v1/games/icons?universeIds={universe_id}&size={}&format=Png&isCircular=false",
            self.upstream.thumbnails_base_url, self.upstream.icon_size
        );
        let resp = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::info!(universe_id, error = %e, "Could not fetch game icon (network error)");
                return None;
            },
        };
        if !resp.status().is_success() {
            tracing::info!(universe_id, status = %resp.status(), "Could not fetch game icon");
            return None;
        }
        match resp.json::<IconsResponse>().await {
            Ok(body) => body
                .data
                .into_iter()
                .next()
                .and_then(|entry| entry.image_url)
                .filter(|url| !url.is_empty()),
            Err(e) => {
                tracing::warn!(universe_id, error = %e, "Undecodable game icon response");
                None
            },
        }
    }
}
