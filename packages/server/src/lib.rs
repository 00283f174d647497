//! WebRTC signaling relay server.
//!
//! Clients join a room over the control API, then open a websocket over
//! which they exchange signaling messages (offers/answers/ICE candidates)
//! addressed to other room members. The server routes announcements between
//! room members without interpreting their payloads.

pub mod domain;
pub mod infrastructure;
pub mod switch;
pub mod ui;
pub mod usecase;
