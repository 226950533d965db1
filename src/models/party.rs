use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LENGTH: usize = 6;

/// A synchronized-watching room
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PartyRoom {
    pub id: i64,
    pub code: String,
    pub movie_id: i64,
    pub movie_title: String,
    pub movie_poster: Option<String>,
    pub host_id: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    /// Members serialized as a JSON array; parse with [`PartyRoom::members`]
    #[serde(skip)]
    pub members: String,
}

impl PartyRoom {
    /// Generates a 6-character room code
    pub fn generate_code() -> String {
        let mut rng = rand::thread_rng();
        (0..CODE_LENGTH)
            .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
            .collect()
    }

    pub fn members(&self) -> Vec<PartyMember> {
        serde_json::from_str(&self.members).unwrap_or_default()
    }
}

/// One participant in a party room
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartyMember {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_host: bool,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartyRoomCreate {
    pub movie_id: i64,
    pub movie_title: String,
    #[serde(default)]
    pub movie_poster: Option<String>,
    pub host_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartyJoinRequest {
    pub room_code: String,
    pub user_id: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartyLeaveRequest {
    pub room_code: String,
    pub user_id: String,
}

/// Playback sync message relayed between members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartySyncRequest {
    pub room_code: String,
    /// play, pause or seek
    pub action: String,
    pub timestamp: i64,
}
