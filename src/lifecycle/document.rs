//! # Document Model & Repository
//!
//! The mutable document record. `content` and `storage_path` always reflect
//! the latest accepted version; the version store holds the history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{LifecycleError, LifecycleResult};

/// Document model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier
    pub id: Uuid,

    /// Title
    pub title: String,

    /// Current text payload
    pub content: String,

    /// Format tag, e.g. "txt", "docx"
    pub format: String,

    /// Opaque locator for the underlying byte payload
    pub storage_path: String,

    /// Owning user
    pub user_id: Uuid,

    /// When the document was created
    pub created_at: DateTime<Utc>,

    /// When the document was last updated
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Create a new document record
    pub fn new(
        title: String,
        content: String,
        format: String,
        storage_path: String,
        user_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            format,
            storage_path,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Document repository trait
pub trait DocumentRepository: Send + Sync {
    /// Find a document by ID
    fn find(&self, id: Uuid) -> LifecycleResult<Option<Document>>;

    /// List all documents
    fn list(&self) -> LifecycleResult<Vec<Document>>;

    /// Insert a new document
    fn insert(&self, document: &Document) -> LifecycleResult<()>;

    /// Overwrite an existing document; NotFound if absent
    fn update(&self, document: &Document) -> LifecycleResult<()>;

    /// Remove a document, returning the removed record; NotFound if absent
    fn remove(&self, id: Uuid) -> LifecycleResult<Document>;
}

/// In-memory document repository
#[derive(Debug, Default)]
pub struct InMemoryDocumentRepository {
    documents: std::sync::RwLock<Vec<Document>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> LifecycleError {
    LifecycleError::Internal("document store lock poisoned".to_string())
}

impl DocumentRepository for InMemoryDocumentRepository {
    fn find(&self, id: Uuid) -> LifecycleResult<Option<Document>> {
        let documents = self.documents.read().map_err(|_| poisoned())?;
        Ok(documents.iter().find(|d| d.id == id).cloned())
    }

    fn list(&self) -> LifecycleResult<Vec<Document>> {
        let documents = self.documents.read().map_err(|_| poisoned())?;
        Ok(documents.clone())
    }

    fn insert(&self, document: &Document) -> LifecycleResult<()> {
        let mut documents = self.documents.write().map_err(|_| poisoned())?;
        documents.push(document.clone());
        Ok(())
    }

    fn update(&self, document: &Document) -> LifecycleResult<()> {
        let mut documents = self.documents.write().map_err(|_| poisoned())?;
        match documents.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => {
                *existing = document.clone();
                Ok(())
            }
            None => Err(LifecycleError::NotFound(document.id)),
        }
    }

    fn remove(&self, id: Uuid) -> LifecycleResult<Document> {
        let mut documents = self.documents.write().map_err(|_| poisoned())?;
        match documents.iter().position(|d| d.id == id) {
            Some(index) => Ok(documents.remove(index)),
            None => Err(LifecycleError::NotFound(id)),
        }
    }
}
