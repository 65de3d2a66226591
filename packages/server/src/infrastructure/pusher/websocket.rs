//! WebSocket を使った RoomPusher 実装
//!
//! ## 責務
//!
//! - WebSocket の `UnboundedSender` を管理
//! - ルーム単位のメンバーシップ管理（join / leave / room_size）
//! - クライアントへのメッセージ送信（push_to, publish）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! `is_live` はクライアントマップへの登録有無で判定します。接続が切れて
//! 登録解除されたクライアントは live ではなくなり、古いメンター ID の
//! 再利用（次の joiner への昇格）が可能になります。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, PushError, PusherChannel, RoomId, RoomPusher};

#[derive(Default)]
struct PusherState {
    /// 接続中のクライアントの WebSocket sender（key: connection id）
    clients: HashMap<String, PusherChannel>,
    /// ルーム ID → メンバーの connection id 集合
    rooms: HashMap<String, HashSet<String>>,
}

/// WebSocket を使った [`RoomPusher`] 実装
pub struct WebSocketRoomPusher {
    state: Mutex<PusherState>,
}

impl WebSocketRoomPusher {
    /// 新しい WebSocketRoomPusher を作成
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PusherState::default()),
        }
    }
}

impl Default for WebSocketRoomPusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomPusher for WebSocketRoomPusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut state = self.state.lock().await;
        state
            .clients
            .insert(connection_id.as_str().to_string(), sender);
        tracing::debug!("Connection '{}' registered to RoomPusher", connection_id.as_str());
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut state = self.state.lock().await;
        state.clients.remove(connection_id.as_str());
        for members in state.rooms.values_mut() {
            members.remove(connection_id.as_str());
        }
        tracing::debug!(
            "Connection '{}' unregistered from RoomPusher",
            connection_id.as_str()
        );
    }

    async fn is_live(&self, connection_id: &ConnectionId) -> bool {
        let state = self.state.lock().await;
        state.clients.contains_key(connection_id.as_str())
    }

    async fn join(&self, connection_id: &ConnectionId, room_id: &RoomId) {
        let mut state = self.state.lock().await;
        state
            .rooms
            .entry(room_id.as_str().to_string())
            .or_default()
            .insert(connection_id.as_str().to_string());
        tracing::debug!(
            "Connection '{}' joined room '{}'",
            connection_id.as_str(),
            room_id.as_str()
        );
    }

    async fn leave(&self, connection_id: &ConnectionId, room_id: &RoomId) {
        let mut state = self.state.lock().await;
        if let Some(members) = state.rooms.get_mut(room_id.as_str()) {
            members.remove(connection_id.as_str());
        }
        tracing::debug!(
            "Connection '{}' left room '{}'",
            connection_id.as_str(),
            room_id.as_str()
        );
    }

    async fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomId> {
        let state = self.state.lock().await;
        state
            .rooms
            .iter()
            .filter(|(_, members)| members.contains(connection_id.as_str()))
            .filter_map(|(room_id, _)| RoomId::new(room_id.clone()).ok())
            .collect()
    }

    async fn room_size(&self, room_id: &RoomId) -> usize {
        let state = self.state.lock().await;
        state
            .rooms
            .get(room_id.as_str())
            .map(|members| members.len())
            .unwrap_or(0)
    }

    async fn push_to(&self, connection_id: &ConnectionId, content: &str) -> Result<(), PushError> {
        let state = self.state.lock().await;
        if let Some(sender) = state.clients.get(connection_id.as_str()) {
            sender
                .send(content.to_string())
                .map_err(|e| PushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed message to connection '{}'", connection_id.as_str());
            Ok(())
        } else {
            Err(PushError::ConnectionNotFound(
                connection_id.as_str().to_string(),
            ))
        }
    }

    async fn publish(&self, room_id: &RoomId, content: &str) -> Result<(), PushError> {
        let state = self.state.lock().await;
        let Some(members) = state.rooms.get(room_id.as_str()) else {
            tracing::debug!(
                "Publish to empty/unknown room '{}', nothing to do",
                room_id.as_str()
            );
            return Ok(());
        };

        for member in members {
            if let Some(sender) = state.clients.get(member) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(content.to_string()) {
                    tracing::warn!("Failed to push message to connection '{}': {}", member, e);
                }
            } else {
                tracing::warn!(
                    "Connection '{}' not registered during publish, skipping",
                    member
                );
            }
        }

        Ok(())
    }
}
