//! HTTP / WebSocket request handlers.

pub mod http;
pub mod websocket;

pub use http::{debug_room_state, get_codeblocks, health_check};
pub use websocket::websocket_handler;
