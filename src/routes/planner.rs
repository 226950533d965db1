use axum::Json;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{Friend, WatchTimeSuggestion},
    services::{suggest_watch_times, PlannerError},
};

#[derive(Debug, Deserialize)]
pub struct SuggestTimesRequest {
    pub friends: Vec<Friend>,
}

/// Scores a friend roster and returns the best watch-time slots.
///
/// A roster where nobody has both a name and availability is a client
/// error, not an empty result.
pub async fn suggest_times(
    Json(request): Json<SuggestTimesRequest>,
) -> AppResult<Json<Vec<WatchTimeSuggestion>>> {
    let suggestions = suggest_watch_times(&request.friends).map_err(|e| match e {
        PlannerError::NoQualifyingFriends => AppError::InvalidInput(
            "Add at least one friend with a name and availability".to_string(),
        ),
    })?;
    Ok(Json(suggestions))
}
