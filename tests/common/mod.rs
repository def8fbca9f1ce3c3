//! Shared test harness: a lifecycle engine wired to in-memory stores, a temp
//! blob directory, and mock conversion/notification collaborators.

#![allow(dead_code)]

use std::sync::Arc;

use docvault::auth::crypto::PasswordPolicy;
use docvault::auth::jwt::AuthContext;
use docvault::auth::user::{InMemoryUserRepository, Role, User, UserRepository};
use docvault::file_storage::local::LocalBackend;
use docvault::lifecycle::audit::{AuditLog, InMemoryAuditLog};
use docvault::lifecycle::convert::MockConverter;
use docvault::lifecycle::document::InMemoryDocumentRepository;
use docvault::lifecycle::engine::{CreateDocument, EngineConfig, LifecycleEngine};
use docvault::lifecycle::notify::{MockDispatcher, NotificationDispatcher};
use docvault::lifecycle::version::{InMemoryVersionStore, VersionStore};
use tempfile::TempDir;

pub struct Harness {
    pub engine: Arc<LifecycleEngine>,
    pub versions: Arc<InMemoryVersionStore>,
    pub audit: Arc<InMemoryAuditLog>,
    pub converter: Arc<MockConverter>,
    pub notifier: Arc<MockDispatcher>,
    pub admin: AuthContext,
    pub editor: AuthContext,
    pub viewer: AuthContext,
    _blob_dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_failing_converter(false)
    }

    pub fn with_failing_converter(fail: bool) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let admin = register(&users, "admin@example.com", Role::Admin);
        let editor = register(&users, "u1@example.com", Role::Editor);
        let viewer = register(&users, "viewer@example.com", Role::Viewer);

        let versions = Arc::new(InMemoryVersionStore::new());
        let audit = Arc::new(InMemoryAuditLog::new());
        let converter = Arc::new(if fail {
            MockConverter::failing()
        } else {
            MockConverter::new()
        });
        let notifier = Arc::new(MockDispatcher::new());
        let blob_dir = TempDir::new().unwrap();

        let engine = Arc::new(LifecycleEngine::new(
            Arc::new(InMemoryDocumentRepository::new()),
            Arc::clone(&versions) as Arc<dyn VersionStore>,
            Arc::clone(&audit) as Arc<dyn AuditLog>,
            users,
            Arc::new(LocalBackend::new(blob_dir.path().to_path_buf())),
            Arc::clone(&converter) as Arc<dyn docvault::lifecycle::convert::ConversionTool>,
            Arc::clone(&notifier) as Arc<dyn NotificationDispatcher>,
            EngineConfig::default(),
        ));

        Self {
            engine,
            versions,
            audit,
            converter,
            notifier,
            admin,
            editor,
            viewer,
            _blob_dir: blob_dir,
        }
    }
}

fn register(users: &Arc<InMemoryUserRepository>, email: &str, role: Role) -> AuthContext {
    let user = User::new(
        email.to_string(),
        email.split('@').next().unwrap_or("user").to_string(),
        "password123",
        role,
        &PasswordPolicy::default(),
    )
    .unwrap();
    users.create(&user).unwrap();
    AuthContext {
        user_id: user.id,
        role,
    }
}

pub fn text_document(title: &str) -> CreateDocument {
    CreateDocument {
        title: title.to_string(),
        format: "txt".to_string(),
        file_name: "test.txt".to_string(),
        payload: b"test content".to_vec(),
    }
}
