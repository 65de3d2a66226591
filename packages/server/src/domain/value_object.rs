//! Value objects for the pairing domain.

use serde::Serialize;
use uuid::Uuid;

use super::error::IdError;

/// Maximum length accepted for identifiers coming in over the wire.
const MAX_ID_LEN: usize = 64;

/// Identifier of a single WebSocket connection.
///
/// Assigned by the server (UUID v4) unless the client supplies its own via
/// the connect query. At most one connection per room holds the mentor
/// role at any instant; the holder is tracked by this id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Create a ConnectionId from a client-supplied string.
    pub fn new(value: String) -> Result<Self, IdError> {
        if value.is_empty() || value.len() > MAX_ID_LEN {
            return Err(IdError::InvalidLength(value.len()));
        }
        Ok(Self(value))
    }

    /// Generate a fresh server-assigned connection id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Identifier of a code-block room. Rooms are keyed by the id of the
/// code-block definition they host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, IdError> {
        if value.is_empty() || value.len() > MAX_ID_LEN {
            return Err(IdError::InvalidLength(value.len()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Role a connection holds inside a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Read-only view of the shared code (enforced by the client UI, not
    /// by the server).
    Mentor,
    /// May edit the shared code; edits are broadcast to all members.
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Mentor => "mentor",
            Role::Student => "student",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_accepts_valid_value() {
        // テスト項目: 有効な文字列から ConnectionId を生成できる
        // given (前提条件):
        let value = "conn-1".to_string();

        // when (操作):
        let result = ConnectionId::new(value);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "conn-1");
    }

    #[test]
    fn test_connection_id_rejects_empty_value() {
        // テスト項目: 空文字列から ConnectionId を生成できない
        // given (前提条件):
        let value = String::new();

        // when (操作):
        let result = ConnectionId::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(IdError::InvalidLength(0)));
    }

    #[test]
    fn test_connection_id_rejects_too_long_value() {
        // テスト項目: 長すぎる文字列から ConnectionId を生成できない
        // given (前提条件):
        let value = "x".repeat(65);

        // when (操作):
        let result = ConnectionId::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(IdError::InvalidLength(65)));
    }

    #[test]
    fn test_generated_connection_ids_are_unique() {
        // テスト項目: 生成された ConnectionId は毎回異なる
        // given (前提条件):

        // when (操作):
        let id1 = ConnectionId::generate();
        let id2 = ConnectionId::generate();

        // then (期待する結果):
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_room_id_accepts_valid_value() {
        // テスト項目: 有効な文字列から RoomId を生成できる
        // given (前提条件):
        let value = "async-case".to_string();

        // when (操作):
        let result = RoomId::new(value);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "async-case");
    }

    #[test]
    fn test_room_id_rejects_empty_value() {
        // テスト項目: 空文字列から RoomId を生成できない
        // given (前提条件):
        let value = String::new();

        // when (操作):
        let result = RoomId::new(value);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_role_as_str() {
        // テスト項目: Role が wire 上の表現に変換される
        // given (前提条件):

        // when (操作):

        // then (期待する結果):
        assert_eq!(Role::Mentor.as_str(), "mentor");
        assert_eq!(Role::Student.as_str(), "student");
    }
}
