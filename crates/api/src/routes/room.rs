use axum::{Json, extract::{Path, Query, State}};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};
use lingoroom_db::models::Room;
use lingoroom_services::dao::base::PaginationParams;
use lingoroom_services::media::AccessGrant;

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
    pub identity: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinRoomRequest {
    /// Stable identity; generated when absent (first join).
    pub identity: Option<String>,
    pub display_name: String,
    /// Preferred caption language, BCP 47.
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LeaveRoomRequest {
    pub identity: String,
}

#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub id: String,
    pub name: String,
    pub meeting_code: String,
    pub status: String,
    pub summary: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JoinRoomResponse {
    pub identity: String,
    pub access_token: String,
    pub expires_in: u64,
    pub room: RoomResponse,
}

#[derive(Debug, Serialize)]
pub struct ParticipantResponse {
    pub identity: String,
    pub display_name: String,
    pub language: Option<String>,
    pub present: bool,
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateRoomRequest>,
) -> Result<Json<RoomResponse>, ApiError> {
    let name = body.name.trim();
    if name.is_empty() || name.len() > 64 {
        return Err(ApiError::Validation(
            "Room name must be 1-64 characters".to_string(),
        ));
    }

    let room = state
        .rooms
        .create(name.to_string(), body.identity)
        .await?;

    // The media room must exist before anyone can connect; creation
    // failure is surfaced here, unlike the best-effort path on join.
    state.media.ensure_room(name).await?;

    Ok(Json(to_response(room)))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = state.rooms.list_open(&params).await?;
    let items: Vec<RoomResponse> = result.items.into_iter().map(to_response).collect();

    Ok(Json(serde_json::json!({
        "items": items,
        "total": result.total,
        "page": result.page,
        "per_page": result.per_page,
        "total_pages": result.total_pages,
    })))
}

pub async fn get(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<RoomResponse>, ApiError> {
    let room = state.rooms.find_by_name(&name).await?;
    Ok(Json(to_response(room)))
}

pub async fn join(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<JoinRoomRequest>,
) -> Result<Json<JoinRoomResponse>, ApiError> {
    let identity = body
        .identity
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let room = state.rooms.find_or_create(&name, &identity).await?;

    // Best effort: most media services create the room lazily on first
    // connect, so a failure here must not block the join.
    if let Err(e) = state.media.ensure_room(&name).await {
        warn!(room = %name, error = %e, "Media room ensure failed, continuing");
    }

    // Token issuance is the one fatal step: without a token the
    // participant cannot connect at all.
    let grant: AccessGrant = state.media.create_token(&identity, &name)?;

    // Participant bookkeeping is best effort: the call experience outranks
    // persistence accuracy.
    let room_id = room.id.ok_or_else(|| {
        ApiError::Internal("Room record has no id".to_string())
    })?;
    if let Err(e) = state
        .participants
        .join(room_id, identity.clone(), body.display_name, body.language)
        .await
    {
        warn!(room = %name, %identity, error = %e, "Failed to record participant, continuing");
    }

    Ok(Json(JoinRoomResponse {
        identity: grant.identity,
        access_token: grant.access_token,
        expires_in: grant.expires_in,
        room: to_response(room),
    }))
}

pub async fn leave(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<LeaveRoomRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let room = state.rooms.find_by_name(&name).await?;
    let room_id = room.id.ok_or_else(|| {
        ApiError::Internal("Room record has no id".to_string())
    })?;

    if let Err(e) = state.participants.mark_left(room_id, &body.identity).await {
        warn!(room = %name, identity = %body.identity, error = %e, "Failed to record leave, continuing");
    }

    Ok(Json(serde_json::json!({ "left": true })))
}

pub async fn participants(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<ParticipantResponse>>, ApiError> {
    let room = state.rooms.find_by_name(&name).await?;
    let room_id = room.id.ok_or_else(|| {
        ApiError::Internal("Room record has no id".to_string())
    })?;

    let participants = state.participants.list_by_room(room_id).await?;
    let response = participants
        .into_iter()
        .map(|p| ParticipantResponse {
            identity: p.identity,
            display_name: p.display_name,
            language: p.language,
            present: p.left_at.is_none(),
        })
        .collect();

    Ok(Json(response))
}

/// Ends the call: summarizes the full transcript (when the summarizer is
/// configured) and closes the room. Summarization failure never blocks
/// ending the call.
pub async fn summary(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let room = state.rooms.find_by_name(&name).await?;
    let room_id = room.id.ok_or_else(|| {
        ApiError::Internal("Room record has no id".to_string())
    })?;

    let entries = state.transcripts.all_by_room(room_id).await?;

    let summary = if state.summarizer.is_available() {
        match state.summarizer.summarize(&name, &entries).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(room = %name, error = %e, "Summarization failed, ending without summary");
                None
            }
        }
    } else {
        None
    };

    state.rooms.end(room_id, summary.clone()).await?;

    Ok(Json(serde_json::json!({
        "ended": true,
        "summary": summary,
    })))
}

fn to_response(room: Room) -> RoomResponse {
    RoomResponse {
        id: room.id.map(|id| id.to_hex()).unwrap_or_default(),
        name: room.name,
        meeting_code: room.meeting_code,
        status: format!("{:?}", room.status).to_lowercase(),
        summary: room.summary,
    }
}
