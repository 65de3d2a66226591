//! Code-block definition store trait.
//!
//! The definition store is an external collaborator holding the static
//! code-block definitions (name, starter code, solution). The domain layer
//! defines the interface it needs; infrastructure provides the
//! implementation (dependency inversion).

use async_trait::async_trait;

use super::{CodeBlock, RoomId, StoreError};

/// Read-only access to code-block definitions.
///
/// The core never writes definitions. Each registry hydration/reset issues
/// exactly one `find_by_id` read.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeBlockStore: Send + Sync {
    /// Fetch one definition by id. `Ok(None)` means the id is unknown,
    /// which callers treat the same way as a store failure: degraded,
    /// non-fatal.
    async fn find_by_id(&self, id: &RoomId) -> Result<Option<CodeBlock>, StoreError>;

    /// List all stored definitions (the HTTP listing endpoint).
    async fn list(&self) -> Result<Vec<CodeBlock>, StoreError>;
}
