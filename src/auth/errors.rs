//! # Auth Errors
//!
//! Error types for the identity provider.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Identity provider errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Bad email/password pair (generic - don't leak whether email exists)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Email already registered
    #[error("Email already registered")]
    EmailAlreadyExists,

    /// Password does not meet requirements
    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),

    /// Role string in a registration request was not recognized
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Bearer token is malformed
    #[error("Malformed token")]
    MalformedToken,

    /// Bearer token has expired
    #[error("Token expired")]
    TokenExpired,

    /// Token signature is invalid
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Password hashing failed
    #[error("Internal error: password hashing failed")]
    HashingFailed,

    /// Token generation failed
    #[error("Internal error: token generation failed")]
    TokenGenerationFailed,

    /// Storage operation failed
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::WeakPassword(_) => 400,
            AuthError::UnknownRole(_) => 400,
            AuthError::MalformedToken => 400,

            AuthError::InvalidCredentials => 401,
            AuthError::TokenExpired => 401,
            AuthError::InvalidSignature => 401,

            AuthError::EmailAlreadyExists => 409,

            AuthError::HashingFailed => 500,
            AuthError::TokenGenerationFailed => 500,
            AuthError::StorageError(_) => 500,
        }
    }
}
