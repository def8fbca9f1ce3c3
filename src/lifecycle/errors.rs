//! # Lifecycle Errors
//!
//! The error taxonomy for document operations. Every variant maps to a
//! distinct HTTP status; `Internal` carries its detail for logging but its
//! Display deliberately hides it from callers.

use thiserror::Error;
use uuid::Uuid;

/// Result type for lifecycle operations
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Document lifecycle errors
#[derive(Debug, Clone, Error)]
pub enum LifecycleError {
    /// No or invalid identity proof
    #[error("Authentication required")]
    Unauthenticated,

    /// Valid identity, insufficient role for the attempted action
    #[error("Insufficient role for {0}")]
    Forbidden(&'static str),

    /// Referenced document absent
    #[error("Document not found: {0}")]
    NotFound(Uuid),

    /// Missing or invalid required field
    #[error("Validation failed: {0}")]
    Validation(String),

    /// External conversion tool failed or timed out
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// Storage or transport failure; detail is logged, not exposed
    #[error("Internal storage error")]
    Internal(String),
}

impl From<crate::file_storage::errors::StorageError> for LifecycleError {
    fn from(err: crate::file_storage::errors::StorageError) -> Self {
        LifecycleError::Internal(err.to_string())
    }
}

impl LifecycleError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            LifecycleError::Validation(_) => 400,
            LifecycleError::Unauthenticated => 401,
            LifecycleError::Forbidden(_) => 403,
            LifecycleError::NotFound(_) => 404,
            LifecycleError::Conversion(_) => 502,
            LifecycleError::Internal(_) => 500,
        }
    }

    /// The detail to log server-side, including what Display hides
    pub fn log_detail(&self) -> String {
        match self {
            LifecycleError::Internal(detail) => detail.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_distinct_per_kind() {
        assert_eq!(LifecycleError::Unauthenticated.status_code(), 401);
        assert_eq!(LifecycleError::Forbidden("delete").status_code(), 403);
        assert_eq!(LifecycleError::NotFound(Uuid::nil()).status_code(), 404);
        assert_eq!(
            LifecycleError::Validation("no payload".into()).status_code(),
            400
        );
        assert_eq!(
            LifecycleError::Conversion("pandoc exited 1".into()).status_code(),
            502
        );
        assert_eq!(LifecycleError::Internal("disk".into()).status_code(), 500);
    }

    #[test]
    fn test_internal_detail_not_in_display() {
        let err = LifecycleError::Internal("io error: /var/lib/docvault full".into());
        assert!(!err.to_string().contains("/var/lib"));
        assert!(err.log_detail().contains("/var/lib"));
    }
}
