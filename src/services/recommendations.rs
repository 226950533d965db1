use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;

use crate::{
    error::AppResult,
    models::{genre_id, CatalogTitle, Movie},
    services::providers::MetadataProvider,
};

/// Maximum number of recommendations returned per request
pub const MAX_RECOMMENDATIONS: usize = 12;

/// How many genres of the user's collection to mine
const TOP_GENRES: usize = 3;

/// Titles pulled per genre and media type
const PER_GENRE: usize = 4;

/// A catalog title suggested to the user, with the reasoning attached
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub title: CatalogTitle,
    pub reason: String,
    pub based_on: String,
}

/// Suggests new titles based on the genres the user already collects.
///
/// Falls back to critically acclaimed picks when the collection is empty
/// or too thin to mine.
pub struct RecommendationEngine {
    provider: Arc<dyn MetadataProvider>,
}

impl RecommendationEngine {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self { provider }
    }

    /// Builds genre-based recommendations for the given collection
    pub async fn recommend(&self, collection: &[Movie]) -> AppResult<Vec<Recommendation>> {
        let genre_counts = tally_genres(collection);
        if genre_counts.is_empty() {
            tracing::info!("Collection has no usable genres, serving fallback picks");
            return self.fallback().await;
        }

        let owned_ids: HashSet<i64> = collection.iter().filter_map(|m| m.tmdb_id).collect();
        let top_genres = top_genres(&genre_counts);

        let mut seen: HashSet<i64> = HashSet::new();
        let mut recommendations = Vec::new();

        for (genre, count) in &top_genres {
            let Some(id) = genre_id(genre) else {
                tracing::debug!(genre = %genre, "No TMDB genre id mapping, skipping");
                continue;
            };

            let based_on = if *count > 1 {
                format!("Your {} {} movies", count, genre)
            } else {
                format!("Your interest in {}", genre)
            };

            let movies = self.provider.discover_movies_by_genre(id, 1).await?;
            collect_picks(
                &mut recommendations,
                &mut seen,
                &owned_ids,
                movies,
                &format!("Popular {} movie", genre),
                &based_on,
            );

            let shows = self.provider.discover_tv_by_genre(id, 1).await?;
            collect_picks(
                &mut recommendations,
                &mut seen,
                &owned_ids,
                shows,
                &format!("Popular {} TV show", genre),
                &based_on,
            );

            if recommendations.len() >= MAX_RECOMMENDATIONS {
                break;
            }
        }

        // Thin collections can exhaust their genres quickly. Pad out the
        // list with acclaimed titles so the response never looks sparse.
        if recommendations.len() < MAX_RECOMMENDATIONS {
            let acclaimed = self
                .provider
                .highly_rated_movies(MAX_RECOMMENDATIONS - recommendations.len())
                .await?;
            collect_picks(
                &mut recommendations,
                &mut seen,
                &owned_ids,
                acclaimed,
                "Critically acclaimed",
                "Highly rated by critics",
            );
        }

        recommendations.truncate(MAX_RECOMMENDATIONS);
        tracing::info!(
            count = recommendations.len(),
            genres = ?top_genres.iter().map(|(g, _)| g.as_str()).collect::<Vec<_>>(),
            "Built recommendations"
        );
        Ok(recommendations)
    }

    /// Critically acclaimed picks, independent of the user's collection
    pub async fn fallback(&self) -> AppResult<Vec<Recommendation>> {
        let titles = self.provider.highly_rated_movies(MAX_RECOMMENDATIONS).await?;
        Ok(titles
            .into_iter()
            .map(|title| Recommendation {
                title,
                reason: "Critically acclaimed".to_string(),
                based_on: "Highly rated by critics".to_string(),
            })
            .collect())
    }
}

/// Counts genre occurrences across the collection. Multi-genre entries
/// are comma separated and contribute once per genre.
fn tally_genres(collection: &[Movie]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for movie in collection {
        for genre in movie.genre.split(',') {
            let genre = genre.trim();
            if genre.is_empty() || genre == "Not specified" {
                continue;
            }
            *counts.entry(genre.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// The most common genres, ties broken alphabetically for stable output
fn top_genres(counts: &HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts
        .iter()
        .map(|(g, c)| (g.clone(), *c))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_GENRES);
    ranked
}

fn collect_picks(
    out: &mut Vec<Recommendation>,
    seen: &mut HashSet<i64>,
    owned: &HashSet<i64>,
    candidates: Vec<CatalogTitle>,
    reason: &str,
    based_on: &str,
) {
    for title in candidates.into_iter().take(PER_GENRE) {
        if owned.contains(&title.id) || !seen.insert(title.id) {
            continue;
        }
        out.push(Recommendation {
            title,
            reason: reason.to_string(),
            based_on: based_on.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaType, WatchStatus};
    use crate::services::providers::MockMetadataProvider;
    use chrono::Utc;

    fn movie(id: i64, tmdb_id: Option<i64>, genre: &str) -> Movie {
        Movie {
            id,
            tmdb_id,
            title: format!("Movie {}", id),
            director: "Someone".to_string(),
            genre: genre.to_string(),
            platform: "Netflix".to_string(),
            status: WatchStatus::Wishlist,
            rating: None,
            review: None,
            episodes_watched: 0,
            total_episodes: None,
            minutes_watched: 0,
            total_minutes: Some(120),
            is_tv_show: false,
            poster_path: None,
            release_date: None,
            overview: None,
            created_at: Utc::now(),
        }
    }

    fn catalog_title(id: i64, media_type: MediaType) -> CatalogTitle {
        CatalogTitle {
            id,
            title: format!("Title {}", id),
            release_date: Some("2023-01-01".to_string()),
            overview: None,
            poster_path: None,
            media_type,
            vote_average: Some(7.5),
            is_tv_show: media_type == MediaType::Tv,
            popularity: 50.0,
        }
    }

    #[test]
    fn test_tally_genres_splits_and_skips_placeholders() {
        let collection = vec![
            movie(1, None, "Action, Drama"),
            movie(2, None, "Action"),
            movie(3, None, "Not specified"),
            movie(4, None, ""),
        ];
        let counts = tally_genres(&collection);
        assert_eq!(counts.get("Action"), Some(&2));
        assert_eq!(counts.get("Drama"), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_top_genres_ranked_with_alphabetical_ties() {
        let mut counts = HashMap::new();
        counts.insert("Drama".to_string(), 2);
        counts.insert("Action".to_string(), 2);
        counts.insert("Comedy".to_string(), 5);
        counts.insert("Horror".to_string(), 1);
        let ranked = top_genres(&counts);
        assert_eq!(
            ranked,
            vec![
                ("Comedy".to_string(), 5),
                ("Action".to_string(), 2),
                ("Drama".to_string(), 2),
            ]
        );
    }

    #[tokio::test]
    async fn test_recommend_excludes_owned_and_duplicate_titles() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_discover_movies_by_genre()
            .returning(|_, _| Ok(vec![catalog_title(10, MediaType::Movie), catalog_title(11, MediaType::Movie)]));
        provider
            .expect_discover_tv_by_genre()
            .returning(|_, _| Ok(vec![catalog_title(20, MediaType::Tv)]));
        provider
            .expect_highly_rated_movies()
            .returning(|_| Ok(vec![catalog_title(10, MediaType::Movie), catalog_title(30, MediaType::Movie)]));

        let engine = RecommendationEngine::new(Arc::new(provider));
        let collection = vec![movie(1, Some(10), "Action"), movie(2, Some(99), "Action")];
        let recs = engine.recommend(&collection).await.unwrap();

        let ids: Vec<i64> = recs.iter().map(|r| r.title.id).collect();
        assert!(!ids.contains(&10), "owned titles must be excluded");
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());
        assert!(ids.contains(&11));
        assert!(ids.contains(&20));
        assert!(ids.contains(&30));
    }

    #[tokio::test]
    async fn test_recommend_reasons_reflect_genre_counts() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_discover_movies_by_genre()
            .returning(|_, _| Ok(vec![catalog_title(10, MediaType::Movie)]));
        provider
            .expect_discover_tv_by_genre()
            .returning(|_, _| Ok(vec![]));
        provider.expect_highly_rated_movies().returning(|_| Ok(vec![]));

        let engine = RecommendationEngine::new(Arc::new(provider));
        let collection = vec![movie(1, None, "Drama"), movie(2, None, "Drama")];
        let recs = engine.recommend(&collection).await.unwrap();

        assert_eq!(recs[0].reason, "Popular Drama movie");
        assert_eq!(recs[0].based_on, "Your 2 Drama movies");
    }

    #[tokio::test]
    async fn test_recommend_falls_back_on_empty_collection() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_highly_rated_movies()
            .returning(|_| Ok(vec![catalog_title(5, MediaType::Movie)]));

        let engine = RecommendationEngine::new(Arc::new(provider));
        let recs = engine.recommend(&[]).await.unwrap();

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].reason, "Critically acclaimed");
        assert_eq!(recs[0].based_on, "Highly rated by critics");
    }

    #[tokio::test]
    async fn test_recommend_skips_unmapped_genres() {
        let mut provider = MockMetadataProvider::new();
        provider.expect_highly_rated_movies().returning(|_| Ok(vec![]));

        let engine = RecommendationEngine::new(Arc::new(provider));
        let collection = vec![movie(1, None, "Mumblecore")];
        let recs = engine.recommend(&collection).await.unwrap();
        assert!(recs.is_empty());
    }
}
