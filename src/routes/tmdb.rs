use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogTitle, MediaType, WatchStatus},
};

use super::AppState;

const DEFAULT_LISTING_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    pub media_type: Option<MediaType>,
    pub limit: Option<usize>,
}

/// Catalog entry annotated with collection membership so the UI can grey
/// out titles the user already tracks
#[derive(Debug, Serialize)]
pub struct AnnotatedTitle {
    #[serde(flatten)]
    pub title: CatalogTitle,
    pub already_added: bool,
    pub existing_status: Option<WatchStatus>,
}

/// Tags each catalog title with whether it is already in the collection
/// and, if so, its watch status
async fn annotate_with_collection(
    state: &AppState,
    titles: Vec<CatalogTitle>,
) -> AppResult<Vec<AnnotatedTitle>> {
    let mut results = Vec::with_capacity(titles.len());
    for title in titles {
        let existing = state.movies.get_by_tmdb_id(title.id).await?;
        results.push(AnnotatedTitle {
            already_added: existing.is_some(),
            existing_status: existing.map(|m| m.status),
            title,
        });
    }
    Ok(results)
}

/// Searches the TMDB catalog for movies and TV shows
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<AnnotatedTitle>>> {
    if query.query.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Search query is required".to_string(),
        ));
    }

    let titles = state.provider.search(query.query.trim(), query.page).await?;
    Ok(Json(annotate_with_collection(&state, titles).await?))
}

/// Popular titles, movies by default
pub async fn popular(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<AnnotatedTitle>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LISTING_LIMIT);
    let titles = match query.media_type.unwrap_or(MediaType::Movie) {
        MediaType::Movie => state.provider.popular_movies(limit).await?,
        MediaType::Tv => state.provider.popular_tv(limit).await?,
    };
    Ok(Json(annotate_with_collection(&state, titles).await?))
}

/// Top-rated titles, movies by default
pub async fn top_rated(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<AnnotatedTitle>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LISTING_LIMIT);
    let titles = match query.media_type.unwrap_or(MediaType::Movie) {
        MediaType::Movie => state.provider.top_rated_movies(limit).await?,
        MediaType::Tv => state.provider.top_rated_tv(limit).await?,
    };
    Ok(Json(annotate_with_collection(&state, titles).await?))
}

/// Highly rated movies from the discover endpoint
pub async fn highly_rated(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<AnnotatedTitle>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LISTING_LIMIT);
    let titles = state.provider.highly_rated_movies(limit).await?;
    Ok(Json(annotate_with_collection(&state, titles).await?))
}

/// Drops all cached catalog responses
pub async fn clear_cache(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.cache.clear().await;
    tracing::info!("TMDB response cache cleared");
    Json(json!({ "message": "TMDB cache cleared" }))
}
