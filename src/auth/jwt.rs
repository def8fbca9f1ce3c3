//! # JWT Token Management
//!
//! Token issue and validation for the identity provider. Validation is
//! stateless: the role travels in the token, so no user lookup is needed to
//! build an [`AuthContext`].

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{AuthError, AuthResult};
use super::user::{Role, User};

/// JWT claims for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID)
    pub sub: String,

    /// User's email
    pub email: String,

    /// User's role at issue time
    pub role: Role,

    /// Issued at timestamp (Unix epoch seconds)
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds)
    pub exp: i64,

    /// Issuer
    pub iss: String,
}

/// Authenticated caller identity, derived from a validated token
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: Role,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing (256-bit minimum recommended)
    pub secret: String,

    /// Access token lifetime
    pub token_ttl: Duration,

    /// Issuer identifier
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "CHANGE_THIS_SECRET_IN_PRODUCTION".to_string(),
            token_ttl: Duration::hours(24),
            issuer: "docvault".to_string(),
        }
    }
}

/// JWT manager for token generation and validation
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    /// Create a new JWT manager with the given configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generate an access token for a user
    pub fn generate_token(&self, user: &User) -> AuthResult<String> {
        let now = Utc::now();
        let exp = now + self.config.token_ttl;

        let claims = JwtClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenGenerationFailed)
    }

    /// Validate a token and extract its claims
    pub fn validate_token(&self, token: &str) -> AuthResult<JwtClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);

        let token_data =
            decode::<JwtClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AuthError::InvalidSignature
                    }
                    _ => AuthError::MalformedToken,
                }
            })?;

        Ok(token_data.claims)
    }

    /// Validate a token and build the caller's [`AuthContext`]
    pub fn authenticate(&self, token: &str) -> AuthResult<AuthContext> {
        let claims = self.validate_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::MalformedToken)?;

        Ok(AuthContext {
            user_id,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::crypto::PasswordPolicy;

    fn test_user(role: Role) -> User {
        User::new(
            "test@example.com".to_string(),
            "Test User".to_string(),
            "password123",
            role,
            &PasswordPolicy::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_token_round_trip() {
        let manager = JwtManager::new(JwtConfig::default());
        let user = test_user(Role::Editor);

        let token = manager.generate_token(&user).unwrap();
        let ctx = manager.authenticate(&token).unwrap();

        assert_eq!(ctx.user_id, user.id);
        assert_eq!(ctx.role, Role::Editor);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let manager = JwtManager::new(JwtConfig::default());
        let other = JwtManager::new(JwtConfig {
            secret: "a-different-secret-entirely".to_string(),
            ..Default::default()
        });

        let token = other.generate_token(&test_user(Role::Admin)).unwrap();
        assert!(manager.authenticate(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let manager = JwtManager::new(JwtConfig::default());
        assert!(matches!(
            manager.authenticate("not-a-jwt"),
            Err(AuthError::MalformedToken)
        ));
    }
}
