use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    models::{
        Movie, MovieCreate, MovieUpdate, RatingReviewUpdate, TmdbMovieAdd, WatchStatus,
        EPISODE_DURATION_MINUTES,
    },
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct MovieListQuery {
    pub genre: Option<String>,
    pub platform: Option<String>,
    pub status: Option<WatchStatus>,
}

/// Lists the collection, optionally filtered by genre, platform or status
pub async fn list_movies(
    State(state): State<AppState>,
    Query(query): Query<MovieListQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = state
        .movies
        .list(query.genre.as_deref(), query.platform.as_deref(), query.status)
        .await?;
    Ok(Json(movies))
}

/// Adds a manually entered title to the collection
pub async fn create_movie(
    State(state): State<AppState>,
    Json(create): Json<MovieCreate>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    validate_platform(&create.platform)?;
    if create.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title is required".to_string()));
    }
    if let Some(tmdb_id) = create.tmdb_id {
        ensure_not_in_collection(&state, tmdb_id).await?;
    }

    let movie = state.movies.insert(&create).await?;
    tracing::info!(id = movie.id, title = %movie.title, "Movie added to collection");
    Ok((StatusCode::CREATED, Json(movie)))
}

/// Imports a title from TMDB, filling in metadata from the catalog
pub async fn add_from_tmdb(
    State(state): State<AppState>,
    Json(request): Json<TmdbMovieAdd>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    validate_platform(&request.platform)?;
    ensure_not_in_collection(&state, request.tmdb_id).await?;

    let details = state
        .provider
        .details(request.tmdb_id, request.is_tv_show)
        .await?;

    let create = MovieCreate {
        title: details.title,
        director: details.director,
        genre: details.genre,
        platform: request.platform,
        status: request.status,
        is_tv_show: request.is_tv_show,
        episodes_watched: 0,
        total_episodes: details.total_episodes,
        minutes_watched: 0,
        total_minutes: details.total_minutes,
        tmdb_id: Some(request.tmdb_id),
        poster_path: details.poster_path,
        overview: details.overview,
        release_date: details.release_date,
    };

    let movie = state.movies.insert(&create).await?;
    tracing::info!(
        id = movie.id,
        tmdb_id = request.tmdb_id,
        title = %movie.title,
        "Title imported from TMDB"
    );
    Ok((StatusCode::CREATED, Json(movie)))
}

/// Updates watch progress and status.
///
/// TV progress is tracked in episodes and converted to minutes; movie
/// progress is tracked in minutes directly. Unless the payload sets an
/// explicit status, a progress change re-derives it.
pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<MovieUpdate>,
) -> AppResult<Json<Movie>> {
    let mut movie = state.movies.get(id).await?;

    if let Some(rating) = update.rating {
        validate_rating(rating)?;
        movie.rating = Some(rating);
    }
    if let Some(review) = update.review {
        movie.review = Some(review);
    }
    if let Some(total_minutes) = update.total_minutes {
        movie.total_minutes = Some(total_minutes);
    }

    let mut progress_touched = false;
    if movie.is_tv_show {
        if let Some(episodes) = update.episodes_watched {
            if episodes < 0 {
                return Err(AppError::InvalidInput(
                    "Episodes watched cannot be negative".to_string(),
                ));
            }
            movie.episodes_watched = episodes;
            movie.minutes_watched = episodes * EPISODE_DURATION_MINUTES;
            progress_touched = true;
        }
    } else if let Some(minutes) = update.minutes_watched {
        if minutes < 0 {
            return Err(AppError::InvalidInput(
                "Minutes watched cannot be negative".to_string(),
            ));
        }
        movie.minutes_watched = minutes;
        progress_touched = true;
    }

    if let Some(status) = update.status {
        movie.status = status;
    } else if progress_touched {
        movie.status = derive_status(&movie);
    }

    state.movies.update(&movie).await?;
    tracing::info!(id = movie.id, status = %movie.status.as_str(), "Movie progress updated");
    Ok(Json(movie))
}

/// Sets the user's rating and review for a title
pub async fn update_rating_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<RatingReviewUpdate>,
) -> AppResult<Json<Movie>> {
    let mut movie = state.movies.get(id).await?;

    if let Some(rating) = update.rating {
        validate_rating(rating)?;
        movie.rating = Some(rating);
    }
    if let Some(review) = update.review {
        movie.review = Some(review);
    }

    state.movies.update(&movie).await?;
    Ok(Json(movie))
}

/// Removes a title from the collection
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    state.movies.delete(id).await?;
    tracing::info!(id, "Movie removed from collection");
    Ok(Json(json!({ "message": "Movie deleted" })))
}

fn validate_platform(platform: &str) -> AppResult<()> {
    if platform.trim().is_empty() {
        return Err(AppError::InvalidInput("Platform is required".to_string()));
    }
    Ok(())
}

fn validate_rating(rating: f64) -> AppResult<()> {
    if !(0.0..=10.0).contains(&rating) {
        return Err(AppError::InvalidInput(
            "Rating must be between 0 and 10".to_string(),
        ));
    }
    Ok(())
}

async fn ensure_not_in_collection(state: &AppState, tmdb_id: i64) -> AppResult<()> {
    if state.movies.get_by_tmdb_id(tmdb_id).await?.is_some() {
        return Err(AppError::InvalidInput(
            "Already in your collection".to_string(),
        ));
    }
    Ok(())
}

/// Derives status from progress when the client does not set one
fn derive_status(movie: &Movie) -> WatchStatus {
    if movie.is_tv_show {
        match movie.total_episodes {
            Some(total) if total > 0 && movie.episodes_watched >= total => WatchStatus::Completed,
            _ if movie.episodes_watched > 0 => WatchStatus::Watching,
            _ => WatchStatus::Wishlist,
        }
    } else {
        match movie.total_minutes {
            Some(total) if total > 0 && movie.minutes_watched >= total => WatchStatus::Completed,
            _ if movie.minutes_watched > 0 => WatchStatus::Watching,
            _ => WatchStatus::Wishlist,
        }
    }
}
