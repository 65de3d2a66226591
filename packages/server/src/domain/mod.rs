//! Domain layer: value objects, entities, pure session logic, and the
//! traits the domain requires from infrastructure (dependency inversion).

pub mod entity;
pub mod error;
pub mod matching;
pub mod pusher;
pub mod registry;
pub mod session;
pub mod store;
pub mod value_object;

pub use entity::{ChatMessage, CodeBlock, RoomState};
pub use error::{IdError, PushError, StoreError};
pub use matching::{codes_match, normalize_code};
pub use pusher::{PusherChannel, RoomPusher};
pub use registry::SessionRegistry;
pub use session::student_count;
pub use store::CodeBlockStore;
pub use value_object::{ConnectionId, Role, RoomId, Timestamp};
