//! # Auth Service
//!
//! Register/login flows for the identity provider. Successful calls yield a
//! signed token carrying the user's role.

use std::sync::Arc;

use serde::Deserialize;

use super::crypto::PasswordPolicy;
use super::errors::{AuthError, AuthResult};
use super::jwt::JwtManager;
use super::user::{Role, User, UserRepository};

/// Registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    /// Optional role string; defaults to VIEWER
    #[serde(default)]
    pub role: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Identity provider service
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: JwtManager,
    policy: PasswordPolicy,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: JwtManager, policy: PasswordPolicy) -> Self {
        Self { users, jwt, policy }
    }

    /// Register a new user and issue a token
    pub fn register(&self, request: RegisterRequest) -> AuthResult<(User, String)> {
        let role = match request.role.as_deref() {
            Some(s) => Role::parse(s)?,
            None => Role::Viewer,
        };

        let user = User::new(
            request.email,
            request.name,
            &request.password,
            role,
            &self.policy,
        )?;

        self.users.create(&user)?;
        let token = self.jwt.generate_token(&user)?;

        Ok((user, token))
    }

    /// Verify credentials and issue a token
    pub fn login(&self, request: LoginRequest) -> AuthResult<(User, String)> {
        let user = self
            .users
            .find_by_email(&request.email)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.verify_password(&request.password)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.jwt.generate_token(&user)?;
        Ok((user, token))
    }
}
