//! # Document Lifecycle
//!
//! The lifecycle engine and its ledgers: documents, versions, audit entries,
//! plus the conversion and notification collaborators it drives.

pub mod audit;
pub mod convert;
pub mod document;
pub mod engine;
pub mod errors;
pub mod notify;
pub mod version;

pub use audit::{AuditAction, AuditEntry, AuditLog};
pub use document::{Document, DocumentRepository};
pub use engine::{CreateDocument, EngineConfig, LifecycleEngine, UpdateDocument};
pub use errors::{LifecycleError, LifecycleResult};
pub use version::{Version, VersionStore};
