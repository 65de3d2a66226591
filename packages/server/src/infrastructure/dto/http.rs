//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Listing entry for `GET /codeblocks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBlockSummaryDto {
    pub id: String,
    pub display_name: String,
}
