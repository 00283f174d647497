//! UseCase: 部屋への参加（コントロールプレーン）

use std::sync::Arc;

use crate::domain::{Room, RoomId, RoomStore, UserId};

use super::error::JoinRoomError;

/// 部屋参加のユースケース
pub struct JoinRoomUseCase {
    store: Arc<dyn RoomStore>,
}

impl JoinRoomUseCase {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// Create the room if needed and add the user as a member.
    pub async fn execute(&self, room_id: RoomId, user_id: UserId) -> Result<Room, JoinRoomError> {
        let room = self
            .store
            .create_or_join_room(room_id, user_id.clone())
            .await
            .map_err(JoinRoomError::Join)?;
        tracing::debug!("User '{}' joined room '{}'", user_id, room.id);
        Ok(room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StoreError;
    use crate::infrastructure::store::InMemoryRoomStore;

    fn room_id(value: &str) -> RoomId {
        RoomId::new(value.to_string()).unwrap()
    }

    fn user_id(value: &str) -> UserId {
        UserId::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_join_room_success() {
        // テスト項目: 部屋が存在しなくても参加でき、部屋が作成される
        // given (前提条件):
        let store = Arc::new(InMemoryRoomStore::new());
        let usecase = JoinRoomUseCase::new(store);

        // when (操作):
        let result = usecase.execute(room_id("r1"), user_id("alice")).await;

        // then (期待する結果):
        let room = result.unwrap();
        assert_eq!(room.id.as_str(), "r1");
        assert_eq!(room.participants.len(), 1);
    }

    #[tokio::test]
    async fn test_join_room_wraps_store_error() {
        // テスト項目: 満室エラーが join 段階のマーカー付きで返される
        // given (前提条件): 定員まで埋まった部屋
        let store = Arc::new(InMemoryRoomStore::new());
        let usecase = JoinRoomUseCase::new(store);
        usecase
            .execute(room_id("r1"), user_id("alice"))
            .await
            .unwrap();
        usecase
            .execute(room_id("r1"), user_id("bob"))
            .await
            .unwrap();

        // when (操作):
        let result = usecase.execute(room_id("r1"), user_id("charlie")).await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinRoomError::Join(StoreError::RoomFull)));
    }
}
