//! Domain models for the signaling relay.

mod announcement;
mod error;
mod ids;
mod room;
mod store;
mod wire;

pub use announcement::{ANNOUNCEMENT_TYPE_JOINED, ANNOUNCEMENT_TYPE_LEFT, Announcement};
pub use error::StoreError;
pub use ids::{DomainError, RoomId, UserId};
pub use room::{DEFAULT_MAX_PARTICIPANTS, Participant, Room, Timestamp};
pub use store::RoomStore;
pub use wire::{PumpWire, SwitchWire, new_wire};

#[cfg(test)]
pub use store::MockRoomStore;
