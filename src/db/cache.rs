use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

/// Keys for cached TMDB lookups
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Search { query: String, page: u32 },
    Details { tmdb_id: i64, is_tv: bool },
    PopularMovies { limit: usize },
    PopularTv { limit: usize },
    TopRatedMovies { limit: usize },
    TopRatedTv { limit: usize },
    HighlyRatedMovies { limit: usize },
    DiscoverMovies { genre_id: i32, page: u32 },
    DiscoverTv { genre_id: i32, page: u32 },
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Search { query, page } => {
                write!(f, "search:{}:{}", query.to_lowercase(), page)
            }
            CacheKey::Details { tmdb_id, is_tv } => {
                write!(f, "details:{}:{}", tmdb_id, if *is_tv { "tv" } else { "movie" })
            }
            CacheKey::PopularMovies { limit } => write!(f, "popular:movie:{}", limit),
            CacheKey::PopularTv { limit } => write!(f, "popular:tv:{}", limit),
            CacheKey::TopRatedMovies { limit } => write!(f, "top:movie:{}", limit),
            CacheKey::TopRatedTv { limit } => write!(f, "top:tv:{}", limit),
            CacheKey::HighlyRatedMovies { limit } => write!(f, "highly:movie:{}", limit),
            CacheKey::DiscoverMovies { genre_id, page } => {
                write!(f, "discover:movie:{}:{}", genre_id, page)
            }
            CacheKey::DiscoverTv { genre_id, page } => {
                write!(f, "discover:tv:{}:{}", genre_id, page)
            }
        }
    }
}

struct CacheEntry {
    stored_at: Instant,
    json: String,
}

/// In-process TTL cache for upstream API responses.
///
/// Values are stored as serialized JSON so the cache stays untyped; a
/// single TTL applies to every entry. Expired entries are dropped lazily
/// on read.
#[derive(Clone)]
pub struct Cache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl Cache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Retrieves a value from the cache by key.
    ///
    /// Returns `None` on a miss or when the entry has expired.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let key = key.to_string();

        let expired = {
            let entries = self.entries.read().await;
            match entries.get(&key) {
                Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                    tracing::debug!(key = %key, "Cache hit");
                    let data = serde_json::from_str(&entry.json).map_err(|e| {
                        AppError::Internal(format!("Cache deserialization error: {}", e))
                    })?;
                    return Ok(Some(data));
                }
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            self.entries.write().await.remove(&key);
        }
        Ok(None)
    }

    /// Stores a value in the cache
    pub async fn set_in_cache<T: serde::Serialize>(&self, key: &CacheKey, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        self.entries.write().await.insert(
            key.to_string(),
            CacheEntry {
                stored_at: Instant::now(),
                json,
            },
        );
    }

    /// Drops every cached entry
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        let dropped = entries.len();
        entries.clear();
        tracing::info!(dropped, "Cache cleared");
    }
}
