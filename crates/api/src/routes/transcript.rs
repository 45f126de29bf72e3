use axum::{Json, extract::{Path, Query, State}};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, state::AppState};
use lingoroom_services::dao::base::PaginationParams;

#[derive(Debug, Deserialize)]
pub struct AppendTranscriptRequest {
    pub identity: String,
    pub speaker_name: String,
    pub text: String,
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranscriptEntryResponse {
    pub id: String,
    pub identity: String,
    pub speaker_name: String,
    pub text: String,
    pub language: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<AppendTranscriptRequest>,
) -> Result<Json<TranscriptEntryResponse>, ApiError> {
    if body.text.trim().is_empty() {
        return Err(ApiError::Validation("Transcript text is empty".to_string()));
    }

    let room = state.rooms.find_by_name(&name).await?;
    let room_id = room.id.ok_or_else(|| {
        ApiError::Internal("Room record has no id".to_string())
    })?;

    let entry = state
        .transcripts
        .append(
            room_id,
            body.identity,
            body.speaker_name,
            body.text,
            body.language,
        )
        .await?;

    Ok(Json(TranscriptEntryResponse {
        id: entry.id.map(|id| id.to_hex()).unwrap_or_default(),
        identity: entry.identity,
        speaker_name: entry.speaker_name,
        text: entry.text,
        language: entry.language,
    }))
}

pub async fn list(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let room = state.rooms.find_by_name(&name).await?;
    let room_id = room.id.ok_or_else(|| {
        ApiError::Internal("Room record has no id".to_string())
    })?;

    let result = state.transcripts.list_by_room(room_id, &params).await?;
    let items: Vec<TranscriptEntryResponse> = result
        .items
        .into_iter()
        .map(|entry| TranscriptEntryResponse {
            id: entry.id.map(|id| id.to_hex()).unwrap_or_default(),
            identity: entry.identity,
            speaker_name: entry.speaker_name,
            text: entry.text,
            language: entry.language,
        })
        .collect();

    Ok(Json(serde_json::json!({
        "items": items,
        "total": result.total,
        "page": result.page,
        "per_page": result.per_page,
        "total_pages": result.total_pages,
    })))
}
