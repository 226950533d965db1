use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    services::reviews::AI21_MODEL,
    services::ReviewLength,
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateReviewRequest {
    #[serde(default)]
    pub length: ReviewLength,
    #[serde(default)]
    pub user_notes: String,
    /// Overrides the stored rating for tone steering
    #[serde(default)]
    pub rating: Option<f64>,
}

/// Drafts a review for a collection title.
///
/// The rating steers tone: the request's rating when given, otherwise the
/// stored one. Always returns a draft; upstream failures degrade to a
/// template rather than an error.
pub async fn generate_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<GenerateReviewRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if let Some(rating) = request.rating {
        if !(0.0..=10.0).contains(&rating) {
            return Err(AppError::InvalidInput(
                "Rating must be between 0 and 10".to_string(),
            ));
        }
    }

    let movie = state.movies.get(id).await?;
    let rating = request.rating.or(movie.rating);
    let review = state
        .reviews
        .generate(&movie.title, &request.user_notes, rating, request.length)
        .await;

    Ok(Json(json!({
        "title": movie.title,
        "review": review,
    })))
}

/// Reports whether AI-backed drafting is available
pub async fn service_status(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "configured": state.reviews.is_configured(),
        "model": AI21_MODEL,
    }))
}
