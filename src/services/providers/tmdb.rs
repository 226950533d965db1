use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::{
    cached,
    config::Config,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        CatalogTitle, MediaType, TitleDetails, TmdbDetails, TmdbListItem, TmdbPage,
        EPISODE_DURATION_MINUTES, MAX_SEARCH_RESULTS, MIN_GOOD_RATING, MIN_TOP_RATING,
    },
};

/// Assumed runtime for movies without one in the catalog
const DEFAULT_MOVIE_MINUTES: i64 = 120;
/// Episodes assumed per season when the catalog lacks an episode count
const ESTIMATED_EPISODES_PER_SEASON: i64 = 10;
/// Vote floor for the discover-based highly-rated listing
const HIGHLY_RATED_MIN_VOTES: u32 = 1000;

/// TMDB-backed metadata provider.
///
/// One configured reqwest client with a fixed timeout; no retries or
/// backoff, failures surface to the caller as-is. Responses are cached
/// in-process with a single TTL.
#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    access_token: Option<String>,
    base_url: String,
    image_base_url: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(config: &Config, cache: Cache) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        if config.tmdb_api_key.is_none() && config.tmdb_access_token.is_none() {
            tracing::warn!("No TMDB credentials configured; catalog lookups will fail");
        }

        Ok(Self {
            http_client,
            api_key: config.tmdb_api_key.clone(),
            access_token: config.tmdb_access_token.clone(),
            base_url: config.tmdb_base_url.clone(),
            image_base_url: config.tmdb_image_base_url.clone(),
            cache,
        })
    }

    /// Clears all cached TMDB responses
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.http_client.get(&url).query(params);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        } else if let Some(key) = &self.api_key {
            request = request.query(&[("api_key", key.as_str())]);
        } else {
            return Err(AppError::ExternalApi(
                "TMDB credentials not configured".to_string(),
            ));
        }

        let response = request.send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound("Title not found on TMDB".to_string()));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    fn full_poster(&self, path: Option<String>) -> Option<String> {
        path.map(|p| format!("{}{}", self.image_base_url, p))
    }

    fn to_catalog_title(&self, item: TmdbListItem, media_type: MediaType) -> CatalogTitle {
        CatalogTitle {
            id: item.id,
            title: item.display_title(),
            release_date: item.date(),
            overview: item.overview.clone(),
            poster_path: self.full_poster(item.poster_path.clone()),
            media_type,
            vote_average: item.vote_average,
            is_tv_show: media_type == MediaType::Tv,
            popularity: item.popularity.unwrap_or(0.0),
        }
    }

    /// Fetches one paged listing and normalizes it, filtering by a rating
    /// floor and capping the length
    async fn rated_listing(
        &self,
        path: &str,
        media_type: MediaType,
        min_rating: f64,
        limit: usize,
        resort_by_rating: bool,
    ) -> AppResult<Vec<CatalogTitle>> {
        let page: TmdbPage<TmdbListItem> =
            self.get_json(path, &[("page", "1".to_string())]).await?;

        let mut titles: Vec<CatalogTitle> = page
            .results
            .into_iter()
            .filter(|item| item.vote_average.unwrap_or(0.0) >= min_rating)
            .map(|item| self.to_catalog_title(item, media_type))
            .collect();

        if resort_by_rating {
            sort_by_rating(&mut titles);
        }
        titles.truncate(limit);

        tracing::info!(
            path = %path,
            results = titles.len(),
            provider = "tmdb",
            "Catalog listing fetched"
        );
        Ok(titles)
    }

    async fn discover_by_genre(
        &self,
        media_type: MediaType,
        genre_id: i32,
        page: u32,
    ) -> AppResult<Vec<CatalogTitle>> {
        let path = match media_type {
            MediaType::Movie => "/discover/movie",
            MediaType::Tv => "/discover/tv",
        };
        let response: TmdbPage<TmdbListItem> = self
            .get_json(
                path,
                &[
                    ("with_genres", genre_id.to_string()),
                    ("page", page.to_string()),
                    ("sort_by", "popularity.desc".to_string()),
                    ("include_adult", "false".to_string()),
                ],
            )
            .await?;

        Ok(response
            .results
            .into_iter()
            .map(|item| self.to_catalog_title(item, media_type))
            .collect())
    }
}

#[async_trait::async_trait]
impl super::MetadataProvider for TmdbProvider {
    async fn search(&self, query: &str, page: u32) -> AppResult<Vec<CatalogTitle>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::Search {
                query: query.to_string(),
                page,
            },
            async {
                let response: TmdbPage<TmdbListItem> = self
                    .get_json(
                        "/search/multi",
                        &[
                            ("query", query.to_string()),
                            ("page", page.to_string()),
                            ("include_adult", "false".to_string()),
                        ],
                    )
                    .await?;

                let mut titles: Vec<CatalogTitle> = response
                    .results
                    .into_iter()
                    .filter_map(|item| match item.media_type.as_deref() {
                        Some("movie") => Some(self.to_catalog_title(item, MediaType::Movie)),
                        Some("tv") => Some(self.to_catalog_title(item, MediaType::Tv)),
                        _ => None,
                    })
                    .collect();

                sort_by_popularity(&mut titles);
                titles.truncate(MAX_SEARCH_RESULTS);

                tracing::info!(
                    query = %query,
                    results = titles.len(),
                    provider = "tmdb",
                    "Title search completed"
                );
                Ok(titles)
            }
        )
    }

    async fn details(&self, tmdb_id: i64, is_tv: bool) -> AppResult<TitleDetails> {
        cached!(
            self.cache,
            CacheKey::Details { tmdb_id, is_tv },
            async {
                let path = if is_tv {
                    format!("/tv/{}", tmdb_id)
                } else {
                    format!("/movie/{}", tmdb_id)
                };
                let raw: TmdbDetails = self.get_json(&path, &[]).await?;
                Ok(self.normalize_details(raw, is_tv))
            }
        )
    }

    async fn popular_movies(&self, limit: usize) -> AppResult<Vec<CatalogTitle>> {
        cached!(self.cache, CacheKey::PopularMovies { limit }, async {
            self.rated_listing("/movie/popular", MediaType::Movie, MIN_GOOD_RATING, limit, true)
                .await
        })
    }

    async fn popular_tv(&self, limit: usize) -> AppResult<Vec<CatalogTitle>> {
        cached!(self.cache, CacheKey::PopularTv { limit }, async {
            self.rated_listing("/tv/popular", MediaType::Tv, MIN_GOOD_RATING, limit, true)
                .await
        })
    }

    async fn top_rated_movies(&self, limit: usize) -> AppResult<Vec<CatalogTitle>> {
        cached!(self.cache, CacheKey::TopRatedMovies { limit }, async {
            // The top_rated chart is already rating-sorted upstream.
            self.rated_listing("/movie/top_rated", MediaType::Movie, MIN_TOP_RATING, limit, false)
                .await
        })
    }

    async fn top_rated_tv(&self, limit: usize) -> AppResult<Vec<CatalogTitle>> {
        cached!(self.cache, CacheKey::TopRatedTv { limit }, async {
            self.rated_listing("/tv/top_rated", MediaType::Tv, MIN_TOP_RATING, limit, false)
                .await
        })
    }

    async fn highly_rated_movies(&self, limit: usize) -> AppResult<Vec<CatalogTitle>> {
        cached!(self.cache, CacheKey::HighlyRatedMovies { limit }, async {
            let response: TmdbPage<TmdbListItem> = self
                .get_json(
                    "/discover/movie",
                    &[
                        ("page", "1".to_string()),
                        ("sort_by", "vote_average.desc".to_string()),
                        ("vote_average.gte", MIN_TOP_RATING.to_string()),
                        ("vote_count.gte", HIGHLY_RATED_MIN_VOTES.to_string()),
                        ("include_adult", "false".to_string()),
                    ],
                )
                .await?;

            let mut titles: Vec<CatalogTitle> = response
                .results
                .into_iter()
                .map(|item| self.to_catalog_title(item, MediaType::Movie))
                .collect();
            titles.truncate(limit);
            Ok(titles)
        })
    }

    async fn discover_movies_by_genre(
        &self,
        genre_id: i32,
        page: u32,
    ) -> AppResult<Vec<CatalogTitle>> {
        cached!(
            self.cache,
            CacheKey::DiscoverMovies { genre_id, page },
            self.discover_by_genre(MediaType::Movie, genre_id, page)
        )
    }

    async fn discover_tv_by_genre(
        &self,
        genre_id: i32,
        page: u32,
    ) -> AppResult<Vec<CatalogTitle>> {
        cached!(
            self.cache,
            CacheKey::DiscoverTv { genre_id, page },
            self.discover_by_genre(MediaType::Tv, genre_id, page)
        )
    }
}

impl TmdbProvider {
    fn normalize_details(&self, raw: TmdbDetails, is_tv: bool) -> TitleDetails {
        let title = raw
            .title
            .clone()
            .or_else(|| raw.name.clone())
            .unwrap_or_default();

        let director = if is_tv {
            let creators: Vec<String> = raw
                .created_by
                .iter()
                .take(2)
                .map(|c| c.name.clone())
                .collect();
            if creators.is_empty() {
                "Not specified".to_string()
            } else {
                creators.join(", ")
            }
        } else {
            "Not specified".to_string()
        };

        let genres: Vec<String> = raw.genres.iter().take(3).map(|g| g.name.clone()).collect();
        let genre = if genres.is_empty() {
            "Not specified".to_string()
        } else {
            genres.join(", ")
        };

        let total_minutes = if is_tv {
            // Episode counts are unreliable for ongoing shows; estimate
            // from seasons when missing.
            let episodes = raw
                .number_of_episodes
                .unwrap_or_else(|| raw.number_of_seasons.unwrap_or(1) * ESTIMATED_EPISODES_PER_SEASON);
            Some(episodes * EPISODE_DURATION_MINUTES)
        } else {
            Some(raw.runtime.unwrap_or(DEFAULT_MOVIE_MINUTES))
        };

        TitleDetails {
            title,
            director,
            genre,
            overview: raw.overview,
            poster_path: self.full_poster(raw.poster_path),
            release_date: raw.release_date.or(raw.first_air_date),
            total_episodes: if is_tv { raw.number_of_episodes } else { None },
            number_of_seasons: if is_tv { raw.number_of_seasons } else { None },
            total_minutes,
        }
    }
}

/// Sorts by popularity, breaking ties on rating, best first
fn sort_by_popularity(titles: &mut [CatalogTitle]) {
    titles.sort_by(|a, b| {
        (b.popularity, b.vote_average.unwrap_or(0.0))
            .partial_cmp(&(a.popularity, a.vote_average.unwrap_or(0.0)))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Sorts by rating, best first
fn sort_by_rating(titles: &mut [CatalogTitle]) {
    titles.sort_by(|a, b| {
        b.vote_average
            .unwrap_or(0.0)
            .partial_cmp(&a.vote_average.unwrap_or(0.0))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
