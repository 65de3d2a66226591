//! In-memory code-block definition store.
//!
//! Stands in for the persistent definition database. Definitions are
//! loaded once at startup, either from a JSON file or from the built-in
//! seed set, and are read-only afterwards.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{CodeBlock, CodeBlockStore, RoomId, StoreError};

/// Persisted record layout, one per code block.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CodeBlockRecord {
    id: String,
    display_name: String,
    starter_code: String,
    solution_code: String,
}

impl CodeBlockRecord {
    fn into_domain(self) -> Result<CodeBlock, StoreError> {
        let id = RoomId::new(self.id).map_err(|e| StoreError::Load(e.to_string()))?;
        Ok(CodeBlock {
            id,
            display_name: self.display_name,
            starter_code: self.starter_code,
            solution_code: self.solution_code,
        })
    }
}

/// In-memory [`CodeBlockStore`] implementation backed by a `HashMap`.
pub struct InMemoryCodeBlockStore {
    definitions: HashMap<String, CodeBlock>,
}

impl InMemoryCodeBlockStore {
    /// Build a store from a list of definitions.
    pub fn new(definitions: Vec<CodeBlock>) -> Self {
        let definitions = definitions
            .into_iter()
            .map(|d| (d.id.as_str().to_string(), d))
            .collect();
        Self { definitions }
    }

    /// Load definitions from a JSON file containing an array of
    /// `{id, displayName, starterCode, solutionCode}` records.
    pub fn from_json_file(path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Load(format!("{}: {}", path.display(), e)))?;
        let records: Vec<CodeBlockRecord> =
            serde_json::from_str(&raw).map_err(|e| StoreError::Load(e.to_string()))?;
        let definitions = records
            .into_iter()
            .map(CodeBlockRecord::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(
            "Loaded {} code block definitions from {}",
            definitions.len(),
            path.display()
        );
        Ok(Self::new(definitions))
    }

    /// Built-in seed set: the four classic JavaScript exercises.
    pub fn seeded() -> Self {
        let definitions = vec![
            seed_block(
                "async-case",
                "Async Case",
                "async function fetchUser(id) {\n  // fetch the user and return their name\n}\n",
                "async function fetchUser(id) {\n  const res = await fetch(`/users/${id}`);\n  const user = await res.json();\n  return user.name;\n}\n",
            ),
            seed_block(
                "promises",
                "Promises",
                "function delay(ms) {\n  // return a promise that resolves after ms milliseconds\n}\n",
                "function delay(ms) {\n  return new Promise((resolve) => setTimeout(resolve, ms));\n}\n",
            ),
            seed_block(
                "callbacks",
                "Callbacks",
                "function readConfig(path, callback) {\n  // call back with (err, data)\n}\n",
                "function readConfig(path, callback) {\n  fs.readFile(path, 'utf8', (err, data) => callback(err, data));\n}\n",
            ),
            seed_block(
                "closures",
                "Closures",
                "function makeCounter() {\n  // return a function that counts up from 1\n}\n",
                "function makeCounter() {\n  let count = 0;\n  return () => ++count;\n}\n",
            ),
        ];
        Self::new(definitions)
    }
}

fn seed_block(id: &str, display_name: &str, starter: &str, solution: &str) -> CodeBlock {
    CodeBlock {
        // Seed ids are static and within bounds
        id: RoomId::new(id.to_string()).expect("seed id should be valid"),
        display_name: display_name.to_string(),
        starter_code: starter.to_string(),
        solution_code: solution.to_string(),
    }
}

#[async_trait]
impl CodeBlockStore for InMemoryCodeBlockStore {
    async fn find_by_id(&self, id: &RoomId) -> Result<Option<CodeBlock>, StoreError> {
        Ok(self.definitions.get(id.as_str()).cloned())
    }

    async fn list(&self) -> Result<Vec<CodeBlock>, StoreError> {
        let mut blocks: Vec<CodeBlock> = self.definitions.values().cloned().collect();
        // Sort by id for consistent ordering
        blocks.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Ok(blocks)
    }
}
