use axum::{Json, extract::State};
use serde::Deserialize;

use crate::{error::ApiError, state::AppState};
use lingoroom_services::messaging::ChannelAuth;

#[derive(Debug, Deserialize)]
pub struct ChannelAuthRequest {
    pub socket_id: String,
    pub channel_name: String,
}

/// Signs a private-channel subscription for the caller's messaging
/// socket.
pub async fn auth(
    State(state): State<AppState>,
    Json(body): Json<ChannelAuthRequest>,
) -> Result<Json<ChannelAuth>, ApiError> {
    if body.socket_id.is_empty() || body.channel_name.is_empty() {
        return Err(ApiError::BadRequest(
            "socket_id and channel_name are required".to_string(),
        ));
    }

    Ok(Json(
        state
            .messaging
            .channel_auth(&body.socket_id, &body.channel_name),
    ))
}
