pub mod movies;
pub mod party;
pub mod planner;
pub mod recommendations;
pub mod reviews;
pub mod stats;
pub mod tmdb;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::{Cache, MovieRepo, PartyRepo},
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{MetadataProvider, ReviewGenerator},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub movies: MovieRepo,
    pub party: PartyRepo,
    pub provider: Arc<dyn MetadataProvider>,
    pub reviews: Arc<ReviewGenerator>,
    pub cache: Cache,
}

/// Health check endpoint
async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Collection
        .route("/movies", get(movies::list_movies))
        .route("/movies", post(movies::create_movie))
        .route("/movies/tmdb/add", post(movies::add_from_tmdb))
        .route("/movies/:id", put(movies::update_movie))
        .route("/movies/:id", delete(movies::delete_movie))
        .route("/movies/:id/rating-review", put(movies::update_rating_review))
        .route("/movies/:id/generate-review", post(reviews::generate_review))
        .route("/stats", get(stats::collection_stats))
        // Catalog
        .route("/tmdb/search", get(tmdb::search))
        .route("/tmdb/popular", get(tmdb::popular))
        .route("/tmdb/top-rated", get(tmdb::top_rated))
        .route("/tmdb/highly-rated", get(tmdb::highly_rated))
        .route("/tmdb/cache", delete(tmdb::clear_cache))
        // Recommendations
        .route("/recommendations", get(recommendations::for_collection))
        .route("/recommendations/fallback", get(recommendations::fallback))
        // Watch parties
        .route("/party/create", post(party::create_party))
        .route("/party/join", post(party::join_party))
        .route("/party/leave", post(party::leave_party))
        .route("/party/end", post(party::end_party))
        .route("/party/sync", post(party::sync_playback))
        .route("/party/start", post(party::start_playback))
        .route("/party/suggest-times", post(planner::suggest_times))
        .route("/party/:code", get(party::get_party))
        // Review service status
        .route("/ai21/status", get(reviews::service_status))
        // Outermost layer last: cors, then request id so the trace span
        // below it can pick the id out of the extensions.
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
