//! UseCase: シグナリングセッション作成
//!
//! 部屋のメンバーであることを確認してから switch に接続を登録し、
//! 他の参加者に joined を通知します。通知はセッション作成を
//! ブロックしません（fire-and-forget）。

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::domain::{
    ANNOUNCEMENT_TYPE_JOINED, Announcement, RoomId, RoomStore, SwitchWire, UserId,
};
use crate::switch::Switch;

use super::error::CreateSessionError;

/// セッション作成のユースケース
pub struct CreateSessionUseCase {
    store: Arc<dyn RoomStore>,
    switch: Arc<Switch>,
}

impl CreateSessionUseCase {
    pub fn new(store: Arc<dyn RoomStore>, switch: Arc<Switch>) -> Self {
        Self { store, switch }
    }

    /// Check that the room exists and `user_id` is one of its members.
    ///
    /// Used by the websocket handler before the upgrade, and again by
    /// [`Self::execute`] right before registration.
    pub async fn authorize(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<(), CreateSessionError> {
        let room = self
            .store
            .get_room(room_id)
            .await
            .map_err(CreateSessionError::GetRoom)?;
        if !room.is_member(user_id) {
            return Err(CreateSessionError::NotAMember(user_id.to_string()));
        }
        Ok(())
    }

    /// セッション作成を実行
    ///
    /// 成功すると `wire` が switch に登録され、転送ループが `cancel` に
    /// 紐づいて起動します。joined 通知の失敗は呼び出し元に伝播しません。
    pub async fn execute(
        &self,
        cancel: CancellationToken,
        room_id: RoomId,
        user_id: UserId,
        wire: SwitchWire,
    ) -> Result<(), CreateSessionError> {
        self.authorize(&room_id, &user_id).await?;

        self.switch
            .connect(cancel.clone(), room_id.clone(), user_id.clone(), wire)
            .await;
        tracing::debug!(
            "Signaling session for '{}' connected in room '{}'",
            user_id,
            room_id
        );

        // joined 通知は接続中のコネクション自身のトークンに紐づく
        let switch = Arc::clone(&self.switch);
        tokio::spawn(async move {
            let ann = Announcement::server(&user_id, ANNOUNCEMENT_TYPE_JOINED);
            switch.broadcast(&cancel, ann, &room_id).await;
        });
        Ok(())
    }
}
