//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use kakehashi_shared::time::timestamp_to_rfc3339;

use crate::domain::{RoomId, UserId};
use crate::infrastructure::dto::http::{GenericResponse, JoinRequest, RoomSummaryDto};
use crate::ui::state::AppState;
use crate::usecase::JoinRoomError;

/// `POST /api/room`: create the room if needed and add the user as a member.
pub async fn join_room(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<JoinRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<GenericResponse>), StatusCode> {
    let Ok(Json(request)) = payload else {
        return Err(StatusCode::BAD_REQUEST);
    };
    let (Ok(room_id), Ok(user_id)) = (
        RoomId::new(request.room_id),
        UserId::new(request.user_id),
    ) else {
        return Err(StatusCode::BAD_REQUEST);
    };

    tracing::trace!("Got join request for room '{}' from '{}'", room_id, user_id);

    match state.join_room_usecase.execute(room_id, user_id).await {
        Ok(_room) => Ok((StatusCode::OK, Json(GenericResponse::ok()))),
        Err(JoinRoomError::Join(source)) => {
            let reason = format!("unable to join room: {}", source);
            Ok((StatusCode::CONFLICT, Json(GenericResponse::error(reason))))
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.list_rooms_usecase.execute().await;

    let summaries: Vec<RoomSummaryDto> = rooms
        .into_iter()
        .map(|room| RoomSummaryDto {
            room_id: room.id.as_str().to_string(),
            participants: room
                .participants
                .iter()
                .map(|p| p.id.as_str().to_string())
                .collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        })
        .collect();

    Json(summaries)
}
