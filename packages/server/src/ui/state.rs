//! Server state shared by the handlers.

use std::sync::Arc;

use crate::usecase::{
    CreateSessionUseCase, DeleteSessionUseCase, JoinRoomUseCase, ListRoomsUseCase,
};

use super::handler::PumpConfig;

/// Shared application state
pub struct AppState {
    /// CreateSessionUseCase（セッション作成のユースケース）
    pub create_session_usecase: Arc<CreateSessionUseCase>,
    /// DeleteSessionUseCase（セッション削除のユースケース）
    pub delete_session_usecase: Arc<DeleteSessionUseCase>,
    /// JoinRoomUseCase（部屋参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// ListRoomsUseCase（部屋一覧のユースケース）
    pub list_rooms_usecase: Arc<ListRoomsUseCase>,
    /// Connection pump timing configuration
    pub pump: PumpConfig,
}
