//! Infrastructure layer: concrete implementations of the domain traits
//! and the wire/HTTP data transfer objects.

pub mod dto;
pub mod pusher;
pub mod registry;
pub mod store;

pub use pusher::WebSocketRoomPusher;
pub use registry::InMemorySessionRegistry;
pub use store::InMemoryCodeBlockStore;
