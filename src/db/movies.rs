use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::{AppError, AppResult};
use crate::models::{CollectionStats, Movie, MovieCreate, WatchStatus};

/// Repository for the movie collection
#[derive(Clone)]
pub struct MovieRepo {
    pool: SqlitePool,
}

const MOVIE_COLUMNS: &str = "id, tmdb_id, title, director, genre, platform, status, rating, \
     review, episodes_watched, total_episodes, minutes_watched, total_minutes, is_tv_show, \
     poster_path, release_date, overview, created_at";

impl MovieRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists collection entries, optionally filtered by genre substring,
    /// platform substring and exact status.
    pub async fn list(
        &self,
        genre: Option<&str>,
        platform: Option<&str>,
        status: Option<WatchStatus>,
    ) -> AppResult<Vec<Movie>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM movies WHERE 1=1", MOVIE_COLUMNS));

        if let Some(genre) = genre {
            builder.push(" AND genre LIKE ");
            builder.push_bind(format!("%{}%", genre));
        }
        if let Some(platform) = platform {
            builder.push(" AND platform LIKE ");
            builder.push_bind(format!("%{}%", platform));
        }
        if let Some(status) = status {
            builder.push(" AND status = ");
            builder.push_bind(status.as_str());
        }
        builder.push(" ORDER BY id");

        let movies = builder.build_query_as::<Movie>().fetch_all(&self.pool).await?;
        Ok(movies)
    }

    pub async fn get(&self, id: i64) -> AppResult<Movie> {
        sqlx::query_as::<_, Movie>(&format!(
            "SELECT {} FROM movies WHERE id = ?",
            MOVIE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))
    }

    pub async fn get_by_tmdb_id(&self, tmdb_id: i64) -> AppResult<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {} FROM movies WHERE tmdb_id = ?",
            MOVIE_COLUMNS
        ))
        .bind(tmdb_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(movie)
    }

    /// Inserts a new entry and returns it with its assigned id
    pub async fn insert(&self, new: &MovieCreate) -> AppResult<Movie> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO movies (tmdb_id, title, director, genre, platform, status, \
             episodes_watched, total_episodes, minutes_watched, total_minutes, is_tv_show, \
             poster_path, release_date, overview, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(new.tmdb_id)
        .bind(&new.title)
        .bind(&new.director)
        .bind(&new.genre)
        .bind(&new.platform)
        .bind(new.status.as_str())
        .bind(new.episodes_watched)
        .bind(new.total_episodes)
        .bind(new.minutes_watched)
        .bind(new.total_minutes)
        .bind(new.is_tv_show)
        .bind(&new.poster_path)
        .bind(&new.release_date)
        .bind(&new.overview)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        self.get(result.last_insert_rowid()).await
    }

    /// Persists every mutable field of an existing entry
    pub async fn update(&self, movie: &Movie) -> AppResult<()> {
        sqlx::query(
            "UPDATE movies SET rating = ?, review = ?, episodes_watched = ?, \
             minutes_watched = ?, total_minutes = ?, status = ? WHERE id = ?",
        )
        .bind(movie.rating)
        .bind(&movie.review)
        .bind(movie.episodes_watched)
        .bind(movie.minutes_watched)
        .bind(movie.total_minutes)
        .bind(movie.status.as_str())
        .bind(movie.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Movie not found".to_string()));
        }
        Ok(())
    }

    /// Aggregate statistics over the whole collection
    pub async fn stats(&self) -> AppResult<CollectionStats> {
        let (total, completed, watching, wishlist, avg_rating, minutes): (
            i64,
            i64,
            i64,
            i64,
            Option<f64>,
            Option<i64>,
        ) = sqlx::query_as(
            "SELECT COUNT(*), \
             COALESCE(SUM(status = 'completed'), 0), \
             COALESCE(SUM(status = 'watching'), 0), \
             COALESCE(SUM(status = 'wishlist'), 0), \
             AVG(rating), \
             SUM(minutes_watched) \
             FROM movies",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(CollectionStats {
            total,
            completed,
            watching,
            wishlist,
            average_rating: (avg_rating.unwrap_or(0.0) * 10.0).round() / 10.0,
            total_minutes_watched: minutes.unwrap_or(0),
        })
    }
}
