//! UseCase: 部屋一覧取得

use std::sync::Arc;

use crate::domain::{Room, RoomStore};

/// 部屋一覧のユースケース
pub struct ListRoomsUseCase {
    store: Arc<dyn RoomStore>,
}

impl ListRoomsUseCase {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// Snapshot of all rooms, sorted by id for consistent ordering.
    pub async fn execute(&self) -> Vec<Room> {
        let mut rooms = self.store.list_rooms().await;
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }
}
