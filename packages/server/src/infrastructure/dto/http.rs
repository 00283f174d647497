//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

/// `POST /api/room` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    pub room_id: String,
    pub user_id: String,
}

/// Generic API response envelope: `message` on success, `error` on failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenericResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenericResponse {
    pub fn ok() -> Self {
        Self {
            message: Some("OK".to_string()),
            error: None,
        }
    }

    pub fn error(reason: String) -> Self {
        Self {
            message: None,
            error: Some(reason),
        }
    }
}

/// Room summary returned by `GET /api/rooms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub room_id: String,
    pub participants: Vec<String>,
    pub created_at: String,
}
