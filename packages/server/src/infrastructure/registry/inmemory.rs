//! In-memory session registry.
//!
//! ## 責務
//!
//! - ルーム ID → RoomState のプロセス全体のマッピングを保持
//! - 初回 join 時に定義ストアから遅延ハイドレーション
//! - メンター離脱時の reset（ストア再読込 + チャット履歴クリア）
//!
//! Entries are reset in place, never deleted: the map only grows for the
//! lifetime of the process. The room map lock makes each registry call
//! atomic (including the store read during hydration); sequences spanning
//! several calls take the per-room operation lock via `lock_room` instead.

use std::collections::{HashMap, hash_map::Entry};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{
    ChatMessage, CodeBlockStore, ConnectionId, RoomId, RoomState, SessionRegistry,
};

/// In-memory [`SessionRegistry`] implementation backed by a `HashMap`.
pub struct InMemorySessionRegistry {
    /// Room id → live room state
    rooms: Mutex<HashMap<String, RoomState>>,
    /// Room id → operation lock serializing multi-call sequences
    op_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    /// Definition store used for hydration and reset
    store: Arc<dyn CodeBlockStore>,
}

impl InMemorySessionRegistry {
    /// Create an empty registry over the given definition store.
    pub fn new(store: Arc<dyn CodeBlockStore>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            op_locks: Mutex::new(HashMap::new()),
            store,
        }
    }

    /// Read the definition for `room_id` and build fresh room state.
    ///
    /// A missing definition or a store failure degrades to empty
    /// code/solution; this is a known non-fatal case, not an error.
    async fn hydrate(&self, room_id: &RoomId) -> RoomState {
        match self.store.find_by_id(room_id).await {
            Ok(Some(definition)) => RoomState::from_definition(Some(&definition)),
            Ok(None) => {
                tracing::warn!(
                    "No code block definition for room '{}', using degraded empty state",
                    room_id.as_str()
                );
                RoomState::from_definition(None)
            }
            Err(e) => {
                tracing::warn!(
                    "Definition store read failed for room '{}': {}, using degraded empty state",
                    room_id.as_str(),
                    e
                );
                RoomState::from_definition(None)
            }
        }
    }

    /// Get a mutable reference to the room's entry, hydrating it first if
    /// this is the first touch.
    async fn entry_mut<'a>(
        &self,
        rooms: &'a mut HashMap<String, RoomState>,
        room_id: &RoomId,
    ) -> &'a mut RoomState {
        match rooms.entry(room_id.as_str().to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let state = self.hydrate(room_id).await;
                tracing::debug!("Hydrated room state for '{}'", room_id.as_str());
                entry.insert(state)
            }
        }
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn lock_room(&self, room_id: &RoomId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.op_locks.lock().await;
            locks
                .entry(room_id.as_str().to_string())
                .or_default()
                .clone()
        };
        lock.lock_owned().await
    }

    async fn get_or_create(&self, room_id: &RoomId) -> RoomState {
        let mut rooms = self.rooms.lock().await;
        self.entry_mut(&mut rooms, room_id).await.clone()
    }

    async fn reset(&self, room_id: &RoomId) {
        let state = {
            let mut rooms = self.rooms.lock().await;
            let fresh = self.hydrate(room_id).await;
            rooms.insert(room_id.as_str().to_string(), fresh.clone());
            fresh
        };
        tracing::info!(
            "Room '{}' reset (code {} bytes, chat cleared)",
            room_id.as_str(),
            state.current_code.len()
        );
    }

    async fn mentor(&self, room_id: &RoomId) -> Option<ConnectionId> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id.as_str()).and_then(|r| r.mentor.clone())
    }

    async fn set_mentor(&self, room_id: &RoomId, connection_id: ConnectionId) {
        let mut rooms = self.rooms.lock().await;
        let state = self.entry_mut(&mut rooms, room_id).await;
        state.mentor = Some(connection_id);
    }

    async fn set_current_code(&self, room_id: &RoomId, new_code: String) -> String {
        let mut rooms = self.rooms.lock().await;
        let state = self.entry_mut(&mut rooms, room_id).await;
        state.current_code = new_code;
        state.reference_solution.clone()
    }

    async fn append_message(&self, room_id: &RoomId, message: ChatMessage) {
        let mut rooms = self.rooms.lock().await;
        let state = self.entry_mut(&mut rooms, room_id).await;
        state.chat_log.push(message);
    }
}
