//! Application use cases.

mod create_session;
mod delete_session;
mod error;
mod join_room;
mod list_rooms;

pub use create_session::CreateSessionUseCase;
pub use delete_session::DeleteSessionUseCase;
pub use error::{CreateSessionError, JoinRoomError};
pub use join_room::JoinRoomUseCase;
pub use list_rooms::ListRoomsUseCase;
