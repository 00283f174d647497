//! Room membership model.

use super::{RoomId, StoreError, UserId};

/// Default number of participants a room accepts. Two peers are enough for
/// the point-to-point WebRTC sessions this relay serves.
pub const DEFAULT_MAX_PARTICIPANTS: usize = 2;

/// Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// One member of a room.
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub id: UserId,
    pub joined_at: Timestamp,
}

impl Participant {
    pub fn new(id: UserId, joined_at: Timestamp) -> Self {
        Self { id, joined_at }
    }
}

/// A capacity-bounded set of member identities.
///
/// The room records who may open a signaling session. Live connection state
/// is owned by the switch, not by the room.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub participants: Vec<Participant>,
    pub created_at: Timestamp,
    capacity: usize,
}

impl Room {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self::with_capacity(id, created_at, DEFAULT_MAX_PARTICIPANTS)
    }

    pub fn with_capacity(id: RoomId, created_at: Timestamp, capacity: usize) -> Self {
        Self {
            id,
            participants: Vec::new(),
            created_at,
            capacity,
        }
    }

    /// Add a participant.
    ///
    /// Joining again as an existing member succeeds even when the room is
    /// full (idempotent membership); a new member beyond capacity is
    /// rejected.
    pub fn add_participant(&mut self, participant: Participant) -> Result<(), StoreError> {
        if self.is_member(&participant.id) {
            return Ok(());
        }
        if self.participants.len() >= self.capacity {
            return Err(StoreError::RoomFull);
        }
        self.participants.push(participant);
        Ok(())
    }

    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.participants.iter().any(|p| &p.id == user_id)
    }
}
