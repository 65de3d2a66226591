//! Session registry trait.
//!
//! Process-wide mapping from room identifier to live [`RoomState`].
//! Entries are created lazily on first join, reset in place on mentor
//! departure, and never deleted for the process lifetime. The UseCase
//! layer depends on this trait, not on the in-memory implementation.

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use super::{ChatMessage, ConnectionId, RoomId, RoomState};

#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Acquire the room's operation lock.
    ///
    /// Individual registry calls are atomic on their own, but a
    /// read-check-write sequence spanning several calls (role arbitration,
    /// the mentor-departure reset, code overwrite plus its broadcast) is
    /// not. Callers hold this guard across such a sequence so that
    /// concurrent events for the same room appear linearized.
    async fn lock_room(&self, room_id: &RoomId) -> OwnedMutexGuard<()>;

    /// Return a point-in-time snapshot of the room's state, hydrating a
    /// fresh entry from the definition store on first touch. An unknown
    /// room id or a store failure degrades to empty code/solution rather
    /// than failing.
    async fn get_or_create(&self, room_id: &RoomId) -> RoomState;

    /// Re-hydrate `current_code`/`reference_solution` from the definition
    /// store and clear mentor and chat log. Used on mentor departure.
    async fn reset(&self, room_id: &RoomId);

    /// Connection currently holding the mentor role, if any.
    async fn mentor(&self, room_id: &RoomId) -> Option<ConnectionId>;

    /// Assign the mentor role to a connection.
    async fn set_mentor(&self, room_id: &RoomId, connection_id: ConnectionId);

    /// Overwrite the live code (last-writer-wins) and return the room's
    /// reference solution for the match check.
    async fn set_current_code(&self, room_id: &RoomId, new_code: String) -> String;

    /// Append a chat message to the room's transcript.
    async fn append_message(&self, room_id: &RoomId, message: ChatMessage);
}
