//! Request handlers.

pub mod http;
pub mod websocket;

pub use http::{get_rooms, health_check, join_room};
pub use websocket::{PumpConfig, signal_handler};
