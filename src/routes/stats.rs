use axum::{extract::State, Json};

use crate::{error::AppResult, models::CollectionStats};

use super::AppState;

/// Aggregate statistics over the whole collection
pub async fn collection_stats(State(state): State<AppState>) -> AppResult<Json<CollectionStats>> {
    let stats = state.movies.stats().await?;
    Ok(Json(stats))
}
