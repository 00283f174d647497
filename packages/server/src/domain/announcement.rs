//! The routed signaling message.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Announcement type broadcast by the server when an endpoint connects.
pub const ANNOUNCEMENT_TYPE_JOINED: &str = "joined";
/// Announcement type broadcast by the server when an endpoint disconnects.
pub const ANNOUNCEMENT_TYPE_LEFT: &str = "left";

/// A signaling message routed between room members.
///
/// `src` on inbound messages is re-assigned by the server from the
/// websocket session identity; the client-supplied value is never trusted.
/// An empty `dst` means broadcast to every other endpoint in the room.
/// `payload` is opaque to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    #[serde(default)]
    pub dst: String,
    #[serde(default)]
    pub src: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Announcement {
    /// Create a server-originated announcement (`joined` / `left`).
    pub fn server(src: &UserId, kind: &str) -> Self {
        Self {
            dst: String::new(),
            src: src.as_str().to_string(),
            kind: kind.to_string(),
            payload: serde_json::Value::Null,
        }
    }

    /// Overwrite `src` with the authenticated session identity.
    pub fn stamp_src(&mut self, user_id: &UserId) {
        self.src = user_id.as_str().to_string();
    }

    /// Whether this announcement targets every other endpoint in the room.
    pub fn is_broadcast(&self) -> bool {
        self.dst.is_empty()
    }
}
