//! Conversion logic between DTOs and domain entities.

use crate::domain::{entity, value_object::Role};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<entity::ChatMessage> for dto::ChatMessageDto {
    fn from(model: entity::ChatMessage) -> Self {
        Self {
            sender_connection_id: model.from.into_string(),
            text: model.text,
            timestamp: model.timestamp.value(),
        }
    }
}

impl From<Role> for dto::Role {
    fn from(role: Role) -> Self {
        match role {
            Role::Mentor => dto::Role::Mentor,
            Role::Student => dto::Role::Student,
        }
    }
}

impl From<entity::CodeBlock> for http::CodeBlockSummaryDto {
    fn from(model: entity::CodeBlock) -> Self {
        Self {
            id: model.id.into_string(),
            display_name: model.display_name,
        }
    }
}
