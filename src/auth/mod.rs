//! # Authentication & Authorization
//!
//! Identity provider (users, credentials, tokens) and the authorization gate
//! consulted by the lifecycle engine.

pub mod crypto;
pub mod errors;
pub mod gate;
pub mod jwt;
pub mod service;
pub mod user;

pub use errors::{AuthError, AuthResult};
pub use gate::{authorize, Action};
pub use jwt::{AuthContext, JwtConfig, JwtManager};
pub use user::{Role, User, UserRepository};
