/// Metadata provider abstraction
///
/// The collection tracker only ever consumes normalized catalog data, so
/// the TMDB client sits behind a trait. Handlers and the recommendation
/// engine depend on the trait, which also keeps them testable with a mock.
use crate::{
    error::AppResult,
    models::{CatalogTitle, TitleDetails},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Source of movie/TV catalog metadata
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Searches movies and TV shows by title.
    ///
    /// Results are sorted by popularity and rating and capped to a small
    /// fixed number for fast rendering.
    async fn search(&self, query: &str, page: u32) -> AppResult<Vec<CatalogTitle>>;

    /// Fetches full details for one title, identified by TMDB id.
    ///
    /// Returns `AppError::NotFound` when the upstream catalog has no such
    /// title.
    async fn details(&self, tmdb_id: i64, is_tv: bool) -> AppResult<TitleDetails>;

    /// Popular movies with a rating of at least 7.0
    async fn popular_movies(&self, limit: usize) -> AppResult<Vec<CatalogTitle>>;

    /// Popular TV shows with a rating of at least 7.0
    async fn popular_tv(&self, limit: usize) -> AppResult<Vec<CatalogTitle>>;

    /// Top-rated movies, strictly 8.0 and above
    async fn top_rated_movies(&self, limit: usize) -> AppResult<Vec<CatalogTitle>>;

    /// Top-rated TV shows, strictly 8.0 and above
    async fn top_rated_tv(&self, limit: usize) -> AppResult<Vec<CatalogTitle>>;

    /// Highly rated movies from the discover endpoint, for variety beyond
    /// the static top-rated chart
    async fn highly_rated_movies(&self, limit: usize) -> AppResult<Vec<CatalogTitle>>;

    /// Movies for one genre, most popular first
    async fn discover_movies_by_genre(&self, genre_id: i32, page: u32)
        -> AppResult<Vec<CatalogTitle>>;

    /// TV shows for one genre, most popular first
    async fn discover_tv_by_genre(&self, genre_id: i32, page: u32)
        -> AppResult<Vec<CatalogTitle>>;
}
