//! # Authorization Gate
//!
//! Static mapping from (role, action) to allow/deny. Callers reach this gate
//! only after authentication; an unauthenticated request is rejected earlier
//! with a distinct error.

use std::fmt;

use super::user::Role;
use crate::lifecycle::errors::LifecycleError;

/// Actions a caller can attempt against the document store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    List,
    Update,
    Delete,
    Convert,
    ListVersions,
    ReadAuditLog,
}

impl Action {
    /// Returns the action name string
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::List => "list",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Convert => "convert",
            Action::ListVersions => "list_versions",
            Action::ReadAuditLog => "read_audit_log",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Check whether `role` may perform `action`
///
/// The table is static:
/// - Create, Update: Admin or Editor
/// - Delete, ReadAuditLog: Admin only
/// - Read, List, ListVersions, Convert: any authenticated role
pub fn authorize(role: Role, action: Action) -> Result<(), LifecycleError> {
    let allowed = match action {
        Action::Create | Action::Update => matches!(role, Role::Admin | Role::Editor),
        Action::Delete | Action::ReadAuditLog => matches!(role, Role::Admin),
        Action::Read | Action::List | Action::ListVersions | Action::Convert => true,
    };

    if allowed {
        Ok(())
    } else {
        Err(LifecycleError::Forbidden(action.as_str()))
    }
}
