use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::{PartyMember, PartyRoom, PartyRoomCreate};

/// Repository for synchronized-watching rooms
#[derive(Clone)]
pub struct PartyRepo {
    pool: SqlitePool,
}

const ROOM_COLUMNS: &str =
    "id, code, movie_id, movie_title, movie_poster, host_id, is_active, created_at, members";

impl PartyRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a room with the host as its first member
    pub async fn create(&self, create: &PartyRoomCreate) -> AppResult<PartyRoom> {
        let code = PartyRoom::generate_code();
        let host = PartyMember {
            id: create.host_id.clone(),
            name: "Host".to_string(),
            is_host: true,
            joined_at: Utc::now(),
        };
        let members = serde_json::to_string(&vec![host])
            .map_err(|e| AppError::Internal(format!("Member serialization error: {}", e)))?;

        sqlx::query(
            "INSERT INTO party_rooms (code, movie_id, movie_title, movie_poster, host_id, \
             is_active, created_at, members) VALUES (?, ?, ?, ?, ?, 1, ?, ?)",
        )
        .bind(&code)
        .bind(create.movie_id)
        .bind(&create.movie_title)
        .bind(&create.movie_poster)
        .bind(&create.host_id)
        .bind(Utc::now())
        .bind(&members)
        .execute(&self.pool)
        .await?;

        tracing::info!(code = %code, movie = %create.movie_title, "Party room created");

        self.get_active(&code).await
    }

    /// Fetches an active room by code; inactive rooms read as not found
    pub async fn get_active(&self, code: &str) -> AppResult<PartyRoom> {
        sqlx::query_as::<_, PartyRoom>(&format!(
            "SELECT {} FROM party_rooms WHERE code = ? AND is_active = 1",
            ROOM_COLUMNS
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Party room not found or inactive".to_string()))
    }

    /// Replaces the member list of a room
    pub async fn set_members(&self, code: &str, members: &[PartyMember]) -> AppResult<()> {
        let json = serde_json::to_string(members)
            .map_err(|e| AppError::Internal(format!("Member serialization error: {}", e)))?;
        sqlx::query("UPDATE party_rooms SET members = ? WHERE code = ?")
            .bind(&json)
            .bind(code)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Deactivates a room; returns NotFound for unknown codes
    pub async fn deactivate(&self, code: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE party_rooms SET is_active = 0 WHERE code = ?")
            .bind(code)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Party room not found".to_string()));
        }
        tracing::info!(code = %code, "Party room ended");
        Ok(())
    }
}
