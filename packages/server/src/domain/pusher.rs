//! Room pub/sub trait.
//!
//! Broadcast fan-out is modeled as an explicit publish/subscribe
//! capability: connections register a push channel, join and leave named
//! rooms, and receive every message published to a room they belong to.
//! Connection liveness (`is_live`) is part of the same capability so role
//! arbitration never reaches into transport internals.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, PushError, RoomId};

/// Channel used to push serialized messages to one connection.
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait RoomPusher: Send + Sync {
    /// Register a connection's push channel.
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Unregister a connection and drop its room memberships' anchor.
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// Whether the connection is currently registered (i.e. live).
    async fn is_live(&self, connection_id: &ConnectionId) -> bool;

    /// Add a connection to a room's broadcast group.
    async fn join(&self, connection_id: &ConnectionId, room_id: &RoomId);

    /// Remove a connection from a room's broadcast group.
    async fn leave(&self, connection_id: &ConnectionId, room_id: &RoomId);

    /// Rooms the connection currently belongs to.
    async fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomId>;

    /// Current size of a room's broadcast group (mentor included).
    async fn room_size(&self, room_id: &RoomId) -> usize;

    /// Push a message to a single connection.
    async fn push_to(&self, connection_id: &ConnectionId, content: &str) -> Result<(), PushError>;

    /// Publish a message to every current member of a room, including the
    /// sender if it is a member. Per-target failures are tolerated.
    async fn publish(&self, room_id: &RoomId, content: &str) -> Result<(), PushError>;
}
