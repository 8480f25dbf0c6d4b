use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::response::Json;

use swarp_core::GameDescriptor;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/game-info/{place_id}: resolve a place id to display metadata.
pub async fn get_game_info(
    State(state): State<AppState>,
    place_id: Result<Path<String>, PathRejection>,
) -> Result<Json<GameDescriptor>, AppError> {
    let Path(place_id) = place_id.map_err(|e| {
        tracing::debug!(error = %e, "Rejected game info path");
        AppError::BadRequest("Invalid place ID".to_string())
    })?;
    let game = state.resolver.resolve(&place_id).await?;
    Ok(Json(game))
}
