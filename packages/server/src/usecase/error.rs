//! UseCase error types.
//!
//! Store errors are wrapped with a stage-identifying marker so the
//! control-plane boundary can tell where a session attempt failed.

use thiserror::Error;

use crate::domain::StoreError;

/// Errors from signaling session creation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CreateSessionError {
    #[error("unable to get room")]
    GetRoom(#[source] StoreError),
    #[error("user '{0}' is not a member of this room")]
    NotAMember(String),
}

/// Errors from the control-plane room join.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinRoomError {
    #[error("unable to join room")]
    Join(#[source] StoreError),
}
