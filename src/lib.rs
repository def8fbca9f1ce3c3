//! docvault - a self-hostable document management service
//!
//! Documents carry versioned content, every state-changing action lands in an
//! append-only audit log, and mutation is role-gated.

pub mod auth;
pub mod file_storage;
pub mod http_server;
pub mod lifecycle;
pub mod observability;
