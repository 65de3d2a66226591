//! WebSocket event DTOs.
//!
//! Every message is a JSON object tagged by an `event` field with
//! camelCase keys, e.g. `{"event":"join","roomId":"async-case"}`.

use serde::{Deserialize, Serialize};

/// Role on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Mentor,
    Student,
}

/// Chat message on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub sender_connection_id: String,
    pub text: String,
    /// Unix millis (UTC)
    pub timestamp: i64,
}

/// Events a client sends to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClientEvent {
    #[serde(rename_all = "camelCase")]
    Join { room_id: String },
    #[serde(rename_all = "camelCase")]
    UpdateCode { room_id: String, new_code: String },
    #[serde(rename_all = "camelCase")]
    SendMessage { room_id: String, text: String },
    #[serde(rename_all = "camelCase")]
    LeaveRoom { room_id: String },
}

/// Events the server sends to clients.
///
/// `Connected` and `Init` are unicast to one connection; everything else
/// is a room broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Handshake: the id the server will know this connection by.
    #[serde(rename_all = "camelCase")]
    Connected { connection_id: String },
    /// Point-in-time room snapshot for a joiner.
    #[serde(rename_all = "camelCase")]
    Init {
        role: Role,
        current_code: String,
        student_count: usize,
        chat_log: Vec<ChatMessageDto>,
    },
    #[serde(rename_all = "camelCase")]
    CodeUpdated { new_code: String },
    #[serde(rename_all = "camelCase")]
    StudentCountChanged { student_count: usize },
    SolutionMatched,
    NewMessage(ChatMessageDto),
    MentorLeft,
}
