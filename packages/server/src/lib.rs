//! Realtime pairing server for codesync.
//!
//! A mentor and students share a code editor and chat inside a "code block"
//! room, with live code sync and automatic solution-match detection. This
//! crate implements the room/session coordination logic: role assignment,
//! per-room state, broadcast fan-out, and recovery on mentor departure.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
