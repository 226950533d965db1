use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minutes assumed per TV episode when deriving watch time
pub const EPISODE_DURATION_MINUTES: i64 = 20;

/// Where a title sits in the user's collection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum WatchStatus {
    Wishlist,
    Watching,
    Completed,
}

impl Default for WatchStatus {
    fn default() -> Self {
        WatchStatus::Wishlist
    }
}

impl WatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchStatus::Wishlist => "wishlist",
            WatchStatus::Watching => "watching",
            WatchStatus::Completed => "completed",
        }
    }
}

/// A movie or TV show in the user's collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Movie {
    pub id: i64,
    pub tmdb_id: Option<i64>,
    pub title: String,
    pub director: String,
    pub genre: String,
    pub platform: String,
    pub status: WatchStatus,
    pub rating: Option<f64>,
    pub review: Option<String>,
    pub episodes_watched: i64,
    pub total_episodes: Option<i64>,
    pub minutes_watched: i64,
    pub total_minutes: Option<i64>,
    pub is_tv_show: bool,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub overview: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating a collection entry by hand
#[derive(Debug, Clone, Deserialize)]
pub struct MovieCreate {
    pub title: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub status: WatchStatus,
    #[serde(default)]
    pub is_tv_show: bool,
    #[serde(default)]
    pub episodes_watched: i64,
    #[serde(default)]
    pub total_episodes: Option<i64>,
    #[serde(default)]
    pub minutes_watched: i64,
    #[serde(default)]
    pub total_minutes: Option<i64>,
    #[serde(default)]
    pub tmdb_id: Option<i64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// Fields accepted when importing a title straight from TMDB
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieAdd {
    pub tmdb_id: i64,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub status: WatchStatus,
    #[serde(default)]
    pub is_tv_show: bool,
}

/// Partial update of progress and status
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieUpdate {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default)]
    pub episodes_watched: Option<i64>,
    #[serde(default)]
    pub minutes_watched: Option<i64>,
    #[serde(default)]
    pub total_minutes: Option<i64>,
    #[serde(default)]
    pub status: Option<WatchStatus>,
}

/// Rating and review update, validated separately from progress
#[derive(Debug, Clone, Deserialize)]
pub struct RatingReviewUpdate {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review: Option<String>,
}

/// Aggregate collection statistics
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CollectionStats {
    pub total: i64,
    pub completed: i64,
    pub watching: i64,
    pub wishlist: i64,
    pub average_rating: f64,
    pub total_minutes_watched: i64,
}
