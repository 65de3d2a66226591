//! Room pusher implementations.

mod websocket;

pub use websocket::WebSocketRoomPusher;
