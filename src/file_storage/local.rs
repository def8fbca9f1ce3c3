//! # Local Filesystem Backend

use std::fs;
use std::path::PathBuf;

use super::backend::StorageBackend;
use super::errors::{StorageError, StorageResult};

/// Local filesystem blob backend rooted at the upload directory
#[derive(Debug)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    /// Create a new local backend
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn full_path(&self, locator: &str) -> StorageResult<PathBuf> {
        // Locators are flat names generated by the engine; reject traversal.
        if locator.contains("..") || locator.starts_with('/') {
            return Err(StorageError::InvalidPath(locator.to_string()));
        }
        Ok(self.root.join(locator))
    }
}

impl StorageBackend for LocalBackend {
    fn path_for(&self, locator: &str) -> StorageResult<PathBuf> {
        self.full_path(locator)
    }

    fn write(&self, locator: &str, data: &[u8]) -> StorageResult<()> {
        let full_path = self.full_path(locator)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::IoError(e.to_string()))?;
        }

        fs::write(&full_path, data).map_err(|e| StorageError::IoError(e.to_string()))
    }

    fn read(&self, locator: &str) -> StorageResult<Vec<u8>> {
        let full_path = self.full_path(locator)?;

        fs::read(&full_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::ObjectNotFound(locator.to_string())
            } else {
                StorageError::IoError(e.to_string())
            }
        })
    }

    fn delete(&self, locator: &str) -> StorageResult<()> {
        let full_path = self.full_path(locator)?;

        fs::remove_file(&full_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::ObjectNotFound(locator.to_string())
            } else {
                StorageError::IoError(e.to_string())
            }
        })
    }

    fn exists(&self, locator: &str) -> StorageResult<bool> {
        Ok(self.full_path(locator)?.exists())
    }
}
