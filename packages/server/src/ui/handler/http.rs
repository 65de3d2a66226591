//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::{RoomId, RoomState},
    infrastructure::dto::http::CodeBlockSummaryDto,
    ui::state::AppState,
};

/// Get the list of available code blocks
pub async fn get_codeblocks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CodeBlockSummaryDto>>, StatusCode> {
    match state.store.list().await {
        Ok(blocks) => {
            // Domain Model から DTO への変換
            let summaries: Vec<CodeBlockSummaryDto> =
                blocks.into_iter().map(Into::into).collect();
            Ok(Json(summaries))
        }
        Err(e) => {
            tracing::error!("Failed to list code blocks: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Debug endpoint to get current room state (for testing purposes)
pub async fn debug_room_state(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomState>, StatusCode> {
    let room_id = match RoomId::new(room_id) {
        Ok(id) => id,
        Err(_) => return Err(StatusCode::BAD_REQUEST),
    };
    let room = state.registry.get_or_create(&room_id).await;
    Ok(Json(room))
}
