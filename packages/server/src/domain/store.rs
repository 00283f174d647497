//! Room store trait.
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Room, RoomId, StoreError, UserId};

/// Room store contract consumed by the session lifecycle coordinator and
/// the control-plane API.
///
/// The store owns the capacity invariant (a room holds at most N members);
/// the switch treats membership as an opaque precondition.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Create the room if absent, then add `user_id` as a member.
    /// Rejoining as an existing member succeeds even when the room is full.
    async fn create_or_join_room(
        &self,
        room_id: RoomId,
        user_id: UserId,
    ) -> Result<Room, StoreError>;

    /// Fetch a room by id.
    async fn get_room(&self, room_id: &RoomId) -> Result<Room, StoreError>;

    /// Snapshot of all rooms.
    async fn list_rooms(&self) -> Vec<Room>;
}
