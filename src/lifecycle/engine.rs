//! # Document Lifecycle Engine
//!
//! Orchestrates create/read/update/delete/convert. Every state change drives
//! the version store and audit log in the same logical transaction, guarded
//! by a per-document lock; the notification dispatcher runs strictly after
//! commit and can only be logged about, never fail an operation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::gate::{authorize, Action};
use crate::auth::jwt::AuthContext;
use crate::auth::user::{Role, User, UserRepository};
use crate::file_storage::backend::StorageBackend;
use crate::observability::logger::{Logger, Severity};

use super::audit::{AuditAction, AuditEntry, AuditLog};
use super::convert::{ConversionTool, DEFAULT_CONVERT_TIMEOUT};
use super::document::{Document, DocumentRepository};
use super::errors::{LifecycleError, LifecycleResult};
use super::notify::NotificationDispatcher;
use super::version::{Version, VersionStore};

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum accepted payload size in bytes
    pub max_file_size: u64,

    /// Wall-clock bound for a single conversion
    pub convert_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            convert_timeout: DEFAULT_CONVERT_TIMEOUT,
        }
    }
}

/// Create request
#[derive(Debug, Clone)]
pub struct CreateDocument {
    pub title: String,
    pub format: String,
    /// Original file name, kept in the storage locator
    pub file_name: String,
    pub payload: Vec<u8>,
}

/// Update request; absent fields keep their current values
#[derive(Debug, Clone, Default)]
pub struct UpdateDocument {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Owner projection attached to read results
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// Document with its owning-user projection
#[derive(Debug, Clone, Serialize)]
pub struct DocumentWithOwner {
    #[serde(flatten)]
    pub document: Document,
    pub user: Option<UserSummary>,
}

/// Version with its author projection
#[derive(Debug, Clone, Serialize)]
pub struct VersionWithAuthor {
    #[serde(flatten)]
    pub version: Version,
    pub user: Option<UserSummary>,
}

/// Result of a successful conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConvertOutcome {
    pub output_path: String,
    pub version: Version,
}

/// The lifecycle engine
///
/// All collaborators are injected at construction; the engine owns no global
/// state beyond its per-document lock map.
pub struct LifecycleEngine {
    documents: Arc<dyn DocumentRepository>,
    versions: Arc<dyn VersionStore>,
    audit: Arc<dyn AuditLog>,
    users: Arc<dyn UserRepository>,
    blobs: Arc<dyn StorageBackend>,
    converter: Arc<dyn ConversionTool>,
    notifier: Arc<dyn NotificationDispatcher>,
    config: EngineConfig,
    locks: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl LifecycleEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        versions: Arc<dyn VersionStore>,
        audit: Arc<dyn AuditLog>,
        users: Arc<dyn UserRepository>,
        blobs: Arc<dyn StorageBackend>,
        converter: Arc<dyn ConversionTool>,
        notifier: Arc<dyn NotificationDispatcher>,
        config: EngineConfig,
    ) -> Self {
        Self {
            documents,
            versions,
            audit,
            users,
            blobs,
            converter,
            notifier,
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Per-document mutex, created on first use
    fn lock_for(&self, id: Uuid) -> LifecycleResult<Arc<tokio::sync::Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| LifecycleError::Internal("lock map poisoned".to_string()))?;
        Ok(Arc::clone(locks.entry(id).or_default()))
    }

    fn drop_lock(&self, id: Uuid) {
        if let Ok(mut locks) = self.locks.lock() {
            locks.remove(&id);
        }
    }

    fn owner_summary(&self, user_id: Uuid) -> LifecycleResult<Option<UserSummary>> {
        let user = self
            .users
            .find_by_id(user_id)
            .map_err(|e| LifecycleError::Internal(e.to_string()))?;
        Ok(user.as_ref().map(UserSummary::from))
    }

    /// Create a document: blob write, document insert, implicit version 1,
    /// CREATE audit entry, then a best-effort notification.
    pub async fn create(
        &self,
        request: CreateDocument,
        ctx: AuthContext,
    ) -> LifecycleResult<Document> {
        authorize(ctx.role, Action::Create)?;

        if request.payload.is_empty() {
            return Err(LifecycleError::Validation("No file uploaded".to_string()));
        }
        if request.payload.len() as u64 > self.config.max_file_size {
            return Err(LifecycleError::Validation(format!(
                "File exceeds maximum size of {} bytes",
                self.config.max_file_size
            )));
        }

        let storage_path = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            request.file_name
        );
        self.blobs.write(&storage_path, &request.payload)?;

        let content = String::from_utf8_lossy(&request.payload).into_owned();
        let document = Document::new(
            request.title,
            content.clone(),
            request.format,
            storage_path,
            ctx.user_id,
        );

        self.documents.insert(&document)?;
        self.versions
            .append(document.id, content, ctx.user_id)?;
        self.audit.record(
            AuditAction::Create,
            format!("Document {} created", document.title),
            ctx.user_id,
            document.id,
        )?;

        Logger::log(
            Severity::Info,
            "document_created",
            &[
                ("document_id", &document.id.to_string()),
                ("title", &document.title),
            ],
        );

        // Post-commit side channel: failure is logged and swallowed.
        self.notify_created(ctx.user_id, &document.title);

        Ok(document)
    }

    fn notify_created(&self, author_id: Uuid, title: &str) {
        let address = match self.users.find_by_id(author_id) {
            Ok(Some(user)) => user.email,
            Ok(None) => return,
            Err(e) => {
                Logger::log_stderr(
                    Severity::Warn,
                    "notification_skipped",
                    &[("reason", &e.to_string())],
                );
                return;
            }
        };

        let body = format!("Your document \"{}\" has been created successfully.", title);
        if let Err(e) = self.notifier.notify(&address, "Document Created", &body) {
            Logger::log_stderr(
                Severity::Warn,
                "notification_failed",
                &[("address", &address), ("reason", &e.to_string())],
            );
        }
    }

    /// Fetch a document with its owner projection
    pub async fn read(&self, id: Uuid, ctx: AuthContext) -> LifecycleResult<DocumentWithOwner> {
        authorize(ctx.role, Action::Read)?;

        let document = self
            .documents
            .find(id)?
            .ok_or(LifecycleError::NotFound(id))?;
        let user = self.owner_summary(document.user_id)?;

        Ok(DocumentWithOwner { document, user })
    }

    /// List all documents with owner projections
    pub async fn list(&self, ctx: AuthContext) -> LifecycleResult<Vec<DocumentWithOwner>> {
        authorize(ctx.role, Action::List)?;

        let mut result = Vec::new();
        for document in self.documents.list()? {
            let user = self.owner_summary(document.user_id)?;
            result.push(DocumentWithOwner { document, user });
        }
        Ok(result)
    }

    /// Update title and/or content, appending a version and an UPDATE entry
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateDocument,
        ctx: AuthContext,
    ) -> LifecycleResult<Document> {
        authorize(ctx.role, Action::Update)?;

        let lock = self.lock_for(id)?;
        let _guard = lock.lock().await;

        let mut document = match self.documents.find(id)? {
            Some(document) => document,
            None => {
                drop(_guard);
                self.drop_lock(id);
                return Err(LifecycleError::NotFound(id));
            }
        };

        if let Some(title) = request.title {
            document.title = title;
        }
        if let Some(content) = request.content {
            document.content = content;
        }
        document.updated_at = Utc::now();

        self.documents.update(&document)?;
        self.versions
            .append(id, document.content.clone(), ctx.user_id)?;
        self.audit.record(
            AuditAction::Update,
            format!("Document {} updated", document.title),
            ctx.user_id,
            id,
        )?;

        Logger::log(
            Severity::Info,
            "document_updated",
            &[("document_id", &id.to_string())],
        );

        Ok(document)
    }

    /// Delete a document; its versions and audit trail survive
    pub async fn delete(&self, id: Uuid, ctx: AuthContext) -> LifecycleResult<Document> {
        authorize(ctx.role, Action::Delete)?;

        let lock = self.lock_for(id)?;
        let result = {
            let _guard = lock.lock().await;
            self.documents.remove(id).and_then(|removed| {
                self.audit.record(
                    AuditAction::Delete,
                    format!("Document {} deleted", removed.title),
                    ctx.user_id,
                    id,
                )?;
                Ok(removed)
            })
        };
        // The entry goes away whether the delete landed or the id was unknown.
        self.drop_lock(id);
        let removed = result?;

        Logger::log(
            Severity::Info,
            "document_deleted",
            &[("document_id", &id.to_string())],
        );

        Ok(removed)
    }

    /// Convert the stored artifact to `target_format`
    ///
    /// The external tool runs on a blocking worker under a timeout; the
    /// document lock is taken only after the tool returns, so unrelated
    /// requests never wait on a conversion. Tool failure writes nothing.
    pub async fn convert(
        &self,
        id: Uuid,
        target_format: String,
        ctx: AuthContext,
    ) -> LifecycleResult<ConvertOutcome> {
        authorize(ctx.role, Action::Convert)?;

        let document = self
            .documents
            .find(id)?
            .ok_or(LifecycleError::NotFound(id))?;

        let output_locator = format!(
            "{}-converted.{}",
            Utc::now().timestamp_millis(),
            target_format
        );

        // Locators are relative to the blob root; the tool needs real paths.
        let source_path = self
            .blobs
            .path_for(&document.storage_path)?
            .to_string_lossy()
            .into_owned();
        let output_path = self
            .blobs
            .path_for(&output_locator)?
            .to_string_lossy()
            .into_owned();

        let converter = Arc::clone(&self.converter);
        let tool_source = source_path;
        let tool_output = output_path.clone();
        let source_format = document.format.clone();
        let tool_target = target_format.clone();
        let task = tokio::task::spawn_blocking(move || {
            converter.convert(&tool_source, &tool_output, &source_format, &tool_target)
        });

        match tokio::time::timeout(self.config.convert_timeout, task).await {
            Err(_) => {
                return Err(LifecycleError::Conversion(
                    "conversion timed out".to_string(),
                ))
            }
            Ok(Err(join_err)) => {
                return Err(LifecycleError::Internal(format!(
                    "conversion task failed: {}",
                    join_err
                )))
            }
            Ok(Ok(result)) => result?,
        }

        let lock = self.lock_for(id)?;
        let _guard = lock.lock().await;

        // The document may have been deleted while the tool ran.
        let document = match self.documents.find(id)? {
            Some(document) => document,
            None => {
                drop(_guard);
                self.drop_lock(id);
                return Err(LifecycleError::NotFound(id));
            }
        };

        // Conversion changes the byte artifact, not the tracked text content.
        let version = self
            .versions
            .append(id, document.content.clone(), ctx.user_id)?;
        self.audit.record(
            AuditAction::Convert,
            format!(
                "Document converted from {} to {}",
                document.format, target_format
            ),
            ctx.user_id,
            id,
        )?;

        Logger::log(
            Severity::Info,
            "document_converted",
            &[
                ("document_id", &id.to_string()),
                ("source_format", &document.format),
                ("target_format", &target_format),
            ],
        );

        Ok(ConvertOutcome {
            output_path,
            version,
        })
    }

    /// List versions for a document, newest number first
    pub async fn list_versions(
        &self,
        id: Uuid,
        ctx: AuthContext,
    ) -> LifecycleResult<Vec<VersionWithAuthor>> {
        authorize(ctx.role, Action::ListVersions)?;

        let mut result = Vec::new();
        for version in self.versions.list(id)? {
            let user = self.owner_summary(version.user_id)?;
            result.push(VersionWithAuthor { version, user });
        }
        Ok(result)
    }

    /// List audit entries for a document, newest first (Admin only)
    ///
    /// Deliberately no existence check: the ledger outlives the document.
    pub async fn list_audit_logs(
        &self,
        id: Uuid,
        ctx: AuthContext,
    ) -> LifecycleResult<Vec<AuditEntry>> {
        authorize(ctx.role, Action::ReadAuditLog)?;
        self.audit.list_for_document(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::crypto::PasswordPolicy;
    use crate::auth::user::InMemoryUserRepository;
    use crate::file_storage::local::LocalBackend;
    use crate::lifecycle::audit::InMemoryAuditLog;
    use crate::lifecycle::convert::MockConverter;
    use crate::lifecycle::document::InMemoryDocumentRepository;
    use crate::lifecycle::notify::MockDispatcher;
    use crate::lifecycle::version::InMemoryVersionStore;
    use tempfile::TempDir;

    struct Harness {
        engine: LifecycleEngine,
        notifier: Arc<MockDispatcher>,
        editor: AuthContext,
        _blob_dir: TempDir,
    }

    fn harness() -> Harness {
        let users = Arc::new(InMemoryUserRepository::new());
        let editor_user = User::new(
            "editor@example.com".to_string(),
            "Editor".to_string(),
            "password123",
            Role::Editor,
            &PasswordPolicy::default(),
        )
        .unwrap();
        users.create(&editor_user).unwrap();

        let blob_dir = TempDir::new().unwrap();
        let notifier = Arc::new(MockDispatcher::new());

        let engine = LifecycleEngine::new(
            Arc::new(InMemoryDocumentRepository::new()),
            Arc::new(InMemoryVersionStore::new()),
            Arc::new(InMemoryAuditLog::new()),
            users,
            Arc::new(LocalBackend::new(blob_dir.path().to_path_buf())),
            Arc::new(MockConverter::new()),
            Arc::clone(&notifier) as Arc<dyn NotificationDispatcher>,
            EngineConfig::default(),
        );

        Harness {
            engine,
            notifier,
            editor: AuthContext {
                user_id: editor_user.id,
                role: Role::Editor,
            },
            _blob_dir: blob_dir,
        }
    }

    fn create_request() -> CreateDocument {
        CreateDocument {
            title: "Test Document".to_string(),
            format: "txt".to_string(),
            file_name: "test.txt".to_string(),
            payload: b"test content".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_create_writes_version_audit_and_notification() {
        let h = harness();
        let doc = h.engine.create(create_request(), h.editor).await.unwrap();

        assert_eq!(doc.content, "test content");

        let versions = h.engine.list_versions(doc.id, h.editor).await.unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].version.number, 1);

        assert_eq!(h.notifier.sent_count(), 1);
        let sent = h.notifier.sent.lock().unwrap();
        assert_eq!(sent[0].0, "editor@example.com");
        assert_eq!(sent[0].1, "Document Created");
    }

    #[tokio::test]
    async fn test_create_rejects_empty_payload() {
        let h = harness();
        let mut request = create_request();
        request.payload.clear();

        let result = h.engine.create(request, h.editor).await;
        assert!(matches!(result, Err(LifecycleError::Validation(_))));
        assert_eq!(h.notifier.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_create() {
        let mut h = harness();
        let failing = Arc::new(MockDispatcher::failing());
        h.engine.notifier = Arc::clone(&failing) as Arc<dyn NotificationDispatcher>;

        let doc = h.engine.create(create_request(), h.editor).await.unwrap();

        // Create committed despite the dispatch failure
        assert!(h.engine.read(doc.id, h.editor).await.is_ok());
        assert_eq!(failing.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_partial_update_merges() {
        let h = harness();
        let doc = h.engine.create(create_request(), h.editor).await.unwrap();

        let updated = h
            .engine
            .update(
                doc.id,
                UpdateDocument {
                    title: None,
                    content: Some("revised".to_string()),
                },
                h.editor,
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Test Document");
        assert_eq!(updated.content, "revised");
    }

    #[tokio::test]
    async fn test_missing_document_leaves_no_lock_entry() {
        let h = harness();
        let admin = AuthContext {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
        };

        let result = h
            .engine
            .update(Uuid::new_v4(), UpdateDocument::default(), h.editor)
            .await;
        assert!(matches!(result, Err(LifecycleError::NotFound(_))));
        assert!(h.engine.locks.lock().unwrap().is_empty());

        let result = h.engine.delete(Uuid::new_v4(), admin).await;
        assert!(matches!(result, Err(LifecycleError::NotFound(_))));
        assert!(h.engine.locks.lock().unwrap().is_empty());

        // A live document keeps its entry between mutations; a failed
        // operation against another id does not add to it.
        let doc = h.engine.create(create_request(), h.editor).await.unwrap();
        h.engine
            .update(doc.id, UpdateDocument::default(), h.editor)
            .await
            .unwrap();
        assert_eq!(h.engine.locks.lock().unwrap().len(), 1);

        let result = h
            .engine
            .update(Uuid::new_v4(), UpdateDocument::default(), h.editor)
            .await;
        assert!(matches!(result, Err(LifecycleError::NotFound(_))));
        assert_eq!(h.engine.locks.lock().unwrap().len(), 1);

        h.engine.delete(doc.id, admin).await.unwrap();
        assert!(h.engine.locks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_viewer_is_forbidden_from_create() {
        let h = harness();
        let viewer = AuthContext {
            user_id: Uuid::new_v4(),
            role: Role::Viewer,
        };

        let result = h.engine.create(create_request(), viewer).await;
        assert!(matches!(result, Err(LifecycleError::Forbidden(_))));
    }
}
