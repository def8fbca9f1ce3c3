//! # Blob Storage Backend Trait
//!
//! The lifecycle engine stores document payloads by opaque locator and never
//! inspects the bytes.

use std::path::PathBuf;

use super::errors::StorageResult;

/// Backend trait for blob storage
pub trait StorageBackend: Send + Sync + std::fmt::Debug {
    /// Write data under the given locator
    fn write(&self, locator: &str, data: &[u8]) -> StorageResult<()>;

    /// Resolve a locator to an on-disk path for external tools
    ///
    /// The returned path need not exist yet; writing through it must be
    /// equivalent to `write` with the same locator.
    fn path_for(&self, locator: &str) -> StorageResult<PathBuf>;

    /// Read the data stored under the locator
    fn read(&self, locator: &str) -> StorageResult<Vec<u8>>;

    /// Delete the blob at the locator
    fn delete(&self, locator: &str) -> StorageResult<()>;

    /// Check whether a locator exists
    fn exists(&self, locator: &str) -> StorageResult<bool>;
}
