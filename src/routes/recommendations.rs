use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    services::{Recommendation, RecommendationEngine},
};

use super::AppState;

/// Recommendations mined from the genres of the user's collection
pub async fn for_collection(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let collection = state.movies.list(None, None, None).await?;
    let engine = RecommendationEngine::new(state.provider.clone());
    let recommendations = engine.recommend(&collection).await?;
    Ok(Json(recommendations))
}

/// Critically acclaimed picks, usable before the collection has any titles
pub async fn fallback(State(state): State<AppState>) -> AppResult<Json<Vec<Recommendation>>> {
    let engine = RecommendationEngine::new(state.provider.clone());
    let recommendations = engine.fallback().await?;
    Ok(Json(recommendations))
}
