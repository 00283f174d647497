//! InMemory RoomStore 実装
//!
//! ドメイン層が定義する RoomStore trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。プロセス再起動をまたぐ
//! 永続化は行いません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use kakehashi_shared::time::{Clock, SystemClock};

use crate::domain::{Participant, Room, RoomId, RoomStore, StoreError, Timestamp, UserId};

/// インメモリ RoomStore 実装
pub struct InMemoryRoomStore {
    db: Mutex<HashMap<RoomId, Room>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a store with an injected clock (used by tests).
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            db: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

impl Default for InMemoryRoomStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn create_or_join_room(
        &self,
        room_id: RoomId,
        user_id: UserId,
    ) -> Result<Room, StoreError> {
        let now = Timestamp::new(self.clock.now_millis());
        let mut db = self.db.lock().await;

        let room = db
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id, now));
        room.add_participant(Participant::new(user_id, now))?;
        Ok(room.clone())
    }

    async fn get_room(&self, room_id: &RoomId) -> Result<Room, StoreError> {
        let db = self.db.lock().await;
        db.get(room_id).cloned().ok_or(StoreError::RoomNotFound)
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let db = self.db.lock().await;
        db.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kakehashi_shared::time::FixedClock;

    fn create_test_store() -> InMemoryRoomStore {
        InMemoryRoomStore::with_clock(Arc::new(FixedClock::new(1_700_000_000_000)))
    }

    fn room_id(value: &str) -> RoomId {
        RoomId::new(value.to_string()).unwrap()
    }

    fn user_id(value: &str) -> UserId {
        UserId::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_create_or_join_creates_room_with_one_member() {
        // テスト項目: 存在しない部屋への参加で部屋が作成され 1 人のメンバーを持つ
        // given (前提条件):
        let store = create_test_store();

        // when (操作):
        let room = store
            .create_or_join_room(room_id("r1"), user_id("alice"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(room.participants.len(), 1);
        assert_eq!(room.participants[0].id.as_str(), "alice");
        assert_eq!(room.created_at.value(), 1_700_000_000_000);
    }

    #[tokio::test]
    async fn test_second_member_joins_existing_room() {
        // テスト項目: 既存の部屋に 2 人目が参加できる
        // given (前提条件):
        let store = create_test_store();
        store
            .create_or_join_room(room_id("r1"), user_id("alice"))
            .await
            .unwrap();

        // when (操作):
        let room = store
            .create_or_join_room(room_id("r1"), user_id("bob"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(room.participants.len(), 2);
    }

    #[tokio::test]
    async fn test_third_member_is_rejected_with_room_full() {
        // テスト項目: 定員 2 の部屋への 3 人目の参加が room full で失敗する
        // given (前提条件):
        let store = create_test_store();
        store
            .create_or_join_room(room_id("r1"), user_id("alice"))
            .await
            .unwrap();
        store
            .create_or_join_room(room_id("r1"), user_id("bob"))
            .await
            .unwrap();

        // when (操作):
        let result = store
            .create_or_join_room(room_id("r1"), user_id("charlie"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(StoreError::RoomFull));
    }

    #[tokio::test]
    async fn test_rejoin_of_full_room_member_succeeds() {
        // テスト項目: 満室の部屋でも既存メンバーの再参加は成功する（冪等性）
        // given (前提条件):
        let store = create_test_store();
        store
            .create_or_join_room(room_id("r1"), user_id("alice"))
            .await
            .unwrap();
        store
            .create_or_join_room(room_id("r1"), user_id("bob"))
            .await
            .unwrap();

        // when (操作):
        let result = store
            .create_or_join_room(room_id("r1"), user_id("alice"))
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().participants.len(), 2);
    }

    #[tokio::test]
    async fn test_get_room_not_found() {
        // テスト項目: 存在しない部屋の取得は not found になる
        // given (前提条件):
        let store = create_test_store();

        // when (操作):
        let result = store.get_room(&room_id("ghost")).await;

        // then (期待する結果):
        assert_eq!(result, Err(StoreError::RoomNotFound));
    }

    #[tokio::test]
    async fn test_list_rooms_returns_all_rooms() {
        // テスト項目: 全ての部屋のスナップショットを取得できる
        // given (前提条件):
        let store = create_test_store();
        store
            .create_or_join_room(room_id("r1"), user_id("alice"))
            .await
            .unwrap();
        store
            .create_or_join_room(room_id("r2"), user_id("bob"))
            .await
            .unwrap();

        // when (操作):
        let rooms = store.list_rooms().await;

        // then (期待する結果):
        assert_eq!(rooms.len(), 2);
    }
}
