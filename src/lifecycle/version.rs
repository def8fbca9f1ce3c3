//! # Version Store
//!
//! Append-only ledger of content snapshots per document. Numbers form a
//! gap-free sequence from 1, assigned as `count + 1` inside the store's write
//! lock so no two appends can observe the same count. A uniqueness check on
//! (document_id, number) backstops the assignment: a duplicate means a broken
//! caller, not a recoverable state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{LifecycleError, LifecycleResult};

/// Immutable content snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    /// Unique version identifier
    pub id: Uuid,

    /// Document this snapshot belongs to
    pub document_id: Uuid,

    /// Content payload at snapshot time
    pub content: String,

    /// Per-document sequence number, starting at 1
    pub number: u64,

    /// Author of the triggering action
    pub user_id: Uuid,

    /// When the snapshot was taken
    pub created_at: DateTime<Utc>,
}

/// Version store trait
///
/// Append-only: no update or delete operation exists.
pub trait VersionStore: Send + Sync {
    /// Append a snapshot, assigning the next number atomically
    fn append(&self, document_id: Uuid, content: String, user_id: Uuid)
        -> LifecycleResult<Version>;

    /// List snapshots for a document, descending by number
    fn list(&self, document_id: Uuid) -> LifecycleResult<Vec<Version>>;

    /// Count snapshots for a document
    fn count(&self, document_id: Uuid) -> LifecycleResult<u64>;
}

/// In-memory version store
#[derive(Debug, Default)]
pub struct InMemoryVersionStore {
    versions: std::sync::RwLock<Vec<Version>>,
}

impl InMemoryVersionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> LifecycleError {
    LifecycleError::Internal("version store lock poisoned".to_string())
}

impl VersionStore for InMemoryVersionStore {
    fn append(
        &self,
        document_id: Uuid,
        content: String,
        user_id: Uuid,
    ) -> LifecycleResult<Version> {
        // Count and insert under one write lock; concurrent appends serialize
        // here, so the count cannot go stale between read and write.
        let mut versions = self.versions.write().map_err(|_| poisoned())?;

        let number = versions
            .iter()
            .filter(|v| v.document_id == document_id)
            .count() as u64
            + 1;

        if versions
            .iter()
            .any(|v| v.document_id == document_id && v.number == number)
        {
            return Err(LifecycleError::Internal(format!(
                "duplicate version number {} for document {}",
                number, document_id
            )));
        }

        let version = Version {
            id: Uuid::new_v4(),
            document_id,
            content,
            number,
            user_id,
            created_at: Utc::now(),
        };

        versions.push(version.clone());
        Ok(version)
    }

    fn list(&self, document_id: Uuid) -> LifecycleResult<Vec<Version>> {
        let versions = self.versions.read().map_err(|_| poisoned())?;
        let mut result: Vec<Version> = versions
            .iter()
            .filter(|v| v.document_id == document_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.number.cmp(&a.number));
        Ok(result)
    }

    fn count(&self, document_id: Uuid) -> LifecycleResult<u64> {
        let versions = self.versions.read().map_err(|_| poisoned())?;
        Ok(versions
            .iter()
            .filter(|v| v.document_id == document_id)
            .count() as u64)
    }
}
