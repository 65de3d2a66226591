//! Domain entities: room state, chat messages, and code-block definitions.

use serde::Serialize;

use super::value_object::{ConnectionId, RoomId, Timestamp};

/// A single chat message inside a room. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    /// Connection that sent the message
    pub from: ConnectionId,
    /// Message body
    pub text: String,
    /// Capture-time instant (receive time at the server)
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(from: ConnectionId, text: String, timestamp: Timestamp) -> Self {
        Self {
            from,
            text,
            timestamp,
        }
    }
}

/// A code-block definition from the external store. Read-only to the core:
/// the server never writes these.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub id: RoomId,
    pub display_name: String,
    pub starter_code: String,
    pub solution_code: String,
}

/// Live state of one code-block room.
///
/// Created lazily on first join, reset in place whenever the mentor
/// departs, and never deleted for the lifetime of the process. Owned and
/// mutated exclusively by the session registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomState {
    /// Connection currently holding the mentor role; `None` means no
    /// mentor is present.
    pub mentor: Option<ConnectionId>,
    /// The live shared document, last-writer-wins.
    pub current_code: String,
    /// Immutable for the room's lifetime, re-read from the store on reset.
    pub reference_solution: String,
    /// Chronological chat transcript. Unbounded growth is a known
    /// limitation (no pruning).
    pub chat_log: Vec<ChatMessage>,
}

impl RoomState {
    /// Build fresh room state from a definition, or a degraded empty state
    /// when the definition is missing or the store read failed.
    pub fn from_definition(definition: Option<&CodeBlock>) -> Self {
        Self {
            mentor: None,
            current_code: definition.map(|d| d.starter_code.clone()).unwrap_or_default(),
            reference_solution: definition
                .map(|d| d.solution_code.clone())
                .unwrap_or_default(),
            chat_log: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_definition() -> CodeBlock {
        CodeBlock {
            id: RoomId::new("async-case".to_string()).unwrap(),
            display_name: "Async Case".to_string(),
            starter_code: "async function main() {}".to_string(),
            solution_code: "async function main() { await run(); }".to_string(),
        }
    }

    #[test]
    fn test_room_state_from_definition() {
        // テスト項目: 定義から作られた RoomState は starter/solution を引き継ぐ
        // given (前提条件):
        let definition = sample_definition();

        // when (操作):
        let state = RoomState::from_definition(Some(&definition));

        // then (期待する結果):
        assert_eq!(state.mentor, None);
        assert_eq!(state.current_code, definition.starter_code);
        assert_eq!(state.reference_solution, definition.solution_code);
        assert!(state.chat_log.is_empty());
    }

    #[test]
    fn test_room_state_from_missing_definition_is_degraded() {
        // テスト項目: 定義が存在しない場合、空文字列で劣化した状態になる
        // given (前提条件):

        // when (操作):
        let state = RoomState::from_definition(None);

        // then (期待する結果):
        assert_eq!(state.mentor, None);
        assert_eq!(state.current_code, "");
        assert_eq!(state.reference_solution, "");
        assert!(state.chat_log.is_empty());
    }
}
