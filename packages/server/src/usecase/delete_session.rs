//! UseCase: シグナリングセッション削除
//!
//! switch から経路を取り除き、残りの参加者に left を通知します。
//! 呼び出し元はこの呼び出しの前（または同時）にコネクションの
//! トークンをキャンセルしている必要があります。

use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::domain::{ANNOUNCEMENT_TYPE_LEFT, Announcement, RoomId, UserId};
use crate::switch::Switch;

/// How long the detached left-announce may keep trying to deliver.
const SESSION_CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// セッション削除のユースケース
pub struct DeleteSessionUseCase {
    switch: Arc<Switch>,
}

impl DeleteSessionUseCase {
    pub fn new(switch: Arc<Switch>) -> Self {
        Self { switch }
    }

    /// セッション削除を実行
    ///
    /// 経路の削除は常に成功します（未登録なら no-op）。left 通知は
    /// 切り離されたタスクで行われ、その失敗はログにのみ残ります。
    pub async fn execute(&self, room_id: RoomId, user_id: UserId) {
        self.switch.disconnect(&room_id, &user_id).await;
        tracing::debug!(
            "Signaling session for '{}' deleted in room '{}'",
            user_id,
            room_id
        );

        let switch = Arc::clone(&self.switch);
        tokio::spawn(async move {
            let cancel = CancellationToken::new();
            let ann = Announcement::server(&user_id, ANNOUNCEMENT_TYPE_LEFT);
            let delivery = switch.broadcast(&cancel, ann, &room_id);
            if tokio::time::timeout(SESSION_CLOSE_TIMEOUT, delivery)
                .await
                .is_err()
            {
                tracing::debug!(
                    "Left announce for '{}' in room '{}' timed out",
                    user_id,
                    room_id
                );
            }
        });
    }
}
