//! Interaction History Storage
//!
//! Persistence collaborator seam for the HTTP layer. Storage is strictly
//! best-effort: a store failure is logged and swallowed, never surfaced to
//! the HTTP caller, and the core scoring path does not depend on it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Mutex;
use thiserror::Error;

/// What kind of interaction a stored record captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    YieldPrediction,
    CropRecommendation,
    ChatMessage,
}

/// One stored interaction: the request as received and the response as sent.
#[derive(Debug, Clone, Serialize)]
pub struct StoredRecord {
    pub kind: RecordKind,
    pub user_id: String,
    pub input: serde_json::Value,
    pub result: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl StoredRecord {
    pub fn new(
        kind: RecordKind,
        user_id: impl Into<String>,
        input: serde_json::Value,
        result: serde_json::Value,
    ) -> Self {
        Self {
            kind,
            user_id: user_id.into(),
            input,
            result,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Persistence collaborator. Implementations must be cheap enough to call
/// inline from a request handler; anything slower belongs behind its own
/// queue.
pub trait ResultStore: Send + Sync {
    fn store(&self, record: StoredRecord) -> Result<(), StorageError>;

    /// Records stored for one user, oldest first. Used by tests and
    /// diagnostics; not part of the HTTP contract.
    fn records_for(&self, user_id: &str) -> Vec<StoredRecord>;

    fn stored_count(&self) -> usize;
}

/// In-memory store. Suitable for development and tests; a database-backed
/// implementation plugs in behind the same trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<StoredRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultStore for MemoryStore {
    fn store(&self, record: StoredRecord) -> Result<(), StorageError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        records.push(record);
        Ok(())
    }

    fn records_for(&self, user_id: &str) -> Vec<StoredRecord> {
        self.records
            .lock()
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.user_id == user_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn stored_count(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }
}

/// Fire-and-forget store call: failures are logged and dropped so the
/// response is never blocked or failed by persistence.
pub fn store_best_effort(store: &dyn ResultStore, record: StoredRecord) {
    let kind = record.kind;
    if let Err(e) = store.store(record) {
        tracing::warn!("Failed to store {:?} record: {}", kind, e);
    }
}
