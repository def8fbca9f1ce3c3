//! # Blob Storage
//!
//! Opaque byte storage behind a narrow backend trait.

pub mod backend;
pub mod errors;
pub mod local;

pub use backend::StorageBackend;
pub use errors::{StorageError, StorageResult};
pub use local::LocalBackend;
