//! Errors produced by room storage.

use thiserror::Error;

/// Errors returned by [`super::RoomStore`] implementations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("room is full")]
    RoomFull,
    #[error("room is not found")]
    RoomNotFound,
}
