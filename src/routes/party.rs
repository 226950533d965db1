use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    models::{PartyJoinRequest, PartyLeaveRequest, PartyMember, PartyRoom, PartyRoomCreate,
        PartySyncRequest},
};

use super::AppState;

const SYNC_ACTIONS: [&str; 3] = ["play", "pause", "seek"];

/// Room as returned to clients, with the member list parsed out
#[derive(Debug, Serialize)]
pub struct PartyRoomResponse {
    pub code: String,
    pub movie_id: i64,
    pub movie_title: String,
    pub movie_poster: Option<String>,
    pub host_id: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub members: Vec<PartyMember>,
}

impl From<PartyRoom> for PartyRoomResponse {
    fn from(room: PartyRoom) -> Self {
        let members = room.members();
        Self {
            code: room.code,
            movie_id: room.movie_id,
            movie_title: room.movie_title,
            movie_poster: room.movie_poster,
            host_id: room.host_id,
            is_active: room.is_active,
            created_at: room.created_at,
            members,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PartyEndRequest {
    pub room_code: String,
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PartyStartRequest {
    pub room_code: String,
    pub user_id: String,
}

/// Opens a room for a title, with the caller as host
pub async fn create_party(
    State(state): State<AppState>,
    Json(request): Json<PartyRoomCreate>,
) -> AppResult<(StatusCode, Json<PartyRoomResponse>)> {
    if request.host_id.trim().is_empty() {
        return Err(AppError::InvalidInput("Host id is required".to_string()));
    }
    // The movie must exist in the collection before a room can reference it.
    state.movies.get(request.movie_id).await?;

    let room = state.party.create(&request).await?;
    Ok((StatusCode::CREATED, Json(room.into())))
}

/// Fetches an active room by code
pub async fn get_party(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<PartyRoomResponse>> {
    let room = state.party.get_active(&code.to_uppercase()).await?;
    Ok(Json(room.into()))
}

/// Joins an active room
pub async fn join_party(
    State(state): State<AppState>,
    Json(request): Json<PartyJoinRequest>,
) -> AppResult<Json<PartyRoomResponse>> {
    let code = request.room_code.to_uppercase();
    let room = state.party.get_active(&code).await?;

    let mut members = room.members();
    if members.iter().any(|m| m.id == request.user_id) {
        return Err(AppError::InvalidInput(
            "User already in party room".to_string(),
        ));
    }
    members.push(PartyMember {
        id: request.user_id.clone(),
        name: request.user_name,
        is_host: false,
        joined_at: Utc::now(),
    });
    state.party.set_members(&code, &members).await?;
    tracing::info!(code = %code, user = %request.user_id, "Member joined party");

    let room = state.party.get_active(&code).await?;
    Ok(Json(room.into()))
}

/// Leaves a room. When the host leaves, or the room empties out, the
/// room is deactivated for everyone.
pub async fn leave_party(
    State(state): State<AppState>,
    Json(request): Json<PartyLeaveRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let code = request.room_code.to_uppercase();
    let room = state.party.get_active(&code).await?;

    let mut members = room.members();
    members.retain(|m| m.id != request.user_id);

    let host_left = room.host_id == request.user_id;
    if host_left || members.is_empty() {
        state.party.deactivate(&code).await?;
        return Ok(Json(json!({ "message": "Party ended", "room_code": code })));
    }

    state.party.set_members(&code, &members).await?;
    tracing::info!(code = %code, user = %request.user_id, "Member left party");
    Ok(Json(json!({ "message": "Left party", "room_code": code })))
}

/// Ends a room; only the host may do this
pub async fn end_party(
    State(state): State<AppState>,
    Json(request): Json<PartyEndRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let code = request.room_code.to_uppercase();
    let room = state.party.get_active(&code).await?;

    if room.host_id != request.user_id {
        return Err(AppError::InvalidInput(
            "Only the host can end the party".to_string(),
        ));
    }

    state.party.deactivate(&code).await?;
    Ok(Json(json!({ "message": "Party ended", "room_code": code })))
}

/// Marks playback as started; host only
pub async fn start_playback(
    State(state): State<AppState>,
    Json(request): Json<PartyStartRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let code = request.room_code.to_uppercase();
    let room = state.party.get_active(&code).await?;

    if room.host_id != request.user_id {
        return Err(AppError::InvalidInput(
            "Only the host can start playback".to_string(),
        ));
    }

    tracing::info!(code = %code, "Party playback started");
    Ok(Json(json!({
        "message": "Playback started",
        "room_code": code,
        "movie_id": room.movie_id,
    })))
}

/// Relays a playback sync event to a room
pub async fn sync_playback(
    State(state): State<AppState>,
    Json(request): Json<PartySyncRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if !SYNC_ACTIONS.contains(&request.action.as_str()) {
        return Err(AppError::InvalidInput(format!(
            "Unknown sync action '{}'",
            request.action
        )));
    }

    let code = request.room_code.to_uppercase();
    state.party.get_active(&code).await?;

    Ok(Json(json!({
        "room_code": code,
        "action": request.action,
        "timestamp": request.timestamp,
        "synced_at": Utc::now(),
    })))
}
