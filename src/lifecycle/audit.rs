//! # Audit Log
//!
//! Append-only ledger of actions taken against documents. Entries are
//! write-once and survive the document they describe; no update or delete
//! operation exists on this store.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{LifecycleError, LifecycleResult};

/// State-changing action kinds recorded in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Convert,
}

impl AuditAction {
    /// Returns the action name string
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
            AuditAction::Convert => "CONVERT",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single immutable audit entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique entry identifier
    pub id: Uuid,

    /// What happened
    pub action: AuditAction,

    /// Free-text detail
    pub details: String,

    /// Who did it
    pub user_id: Uuid,

    /// Which document it happened to (may no longer exist)
    pub document_id: Uuid,

    /// When it happened
    pub created_at: DateTime<Utc>,
}

/// Audit log trait
///
/// `record` must succeed before the triggering action is considered
/// committed; its failure aborts the whole operation.
pub trait AuditLog: Send + Sync {
    /// Append an entry to the ledger
    fn record(
        &self,
        action: AuditAction,
        details: String,
        user_id: Uuid,
        document_id: Uuid,
    ) -> LifecycleResult<AuditEntry>;

    /// List entries for a document, descending by creation time
    fn list_for_document(&self, document_id: Uuid) -> LifecycleResult<Vec<AuditEntry>>;
}

/// In-memory audit log
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    entries: std::sync::RwLock<Vec<AuditEntry>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> LifecycleError {
    LifecycleError::Internal("audit log lock poisoned".to_string())
}

impl AuditLog for InMemoryAuditLog {
    fn record(
        &self,
        action: AuditAction,
        details: String,
        user_id: Uuid,
        document_id: Uuid,
    ) -> LifecycleResult<AuditEntry> {
        let entry = AuditEntry {
            id: Uuid::new_v4(),
            action,
            details,
            user_id,
            document_id,
            created_at: Utc::now(),
        };

        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.push(entry.clone());
        Ok(entry)
    }

    fn list_for_document(&self, document_id: Uuid) -> LifecycleResult<Vec<AuditEntry>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        let mut result: Vec<AuditEntry> = entries
            .iter()
            .filter(|e| e.document_id == document_id)
            .cloned()
            .collect();
        // Reverse insertion order first so the stable sort breaks equal
        // timestamps toward the later-recorded entry.
        result.reverse();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }
}
