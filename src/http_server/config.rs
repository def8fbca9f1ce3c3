//! HTTP Server Configuration
//!
//! Server binding plus the environment-driven settings for the lifecycle
//! engine's collaborators. Everything is read once at startup and injected;
//! no component reads the environment on its own.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::jwt::JwtConfig;
use crate::lifecycle::engine::EngineConfig;
use crate::lifecycle::notify::SmtpConfig;

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins (empty = permissive, for development)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Full service configuration assembled from the environment
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub http: HttpServerConfig,
    pub upload_dir: String,
    pub jwt: JwtConfig,
    pub engine: EngineConfig,
    pub smtp: SmtpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            http: HttpServerConfig::default(),
            upload_dir: "./uploads".to_string(),
            jwt: JwtConfig::default(),
            engine: EngineConfig::default(),
            smtp: SmtpConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Build configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse() {
                config.http.port = port;
            }
        }
        if let Ok(upload_dir) = std::env::var("UPLOAD_DIR") {
            config.upload_dir = upload_dir;
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            config.jwt.secret = secret;
        }
        if let Ok(size) = std::env::var("MAX_FILE_SIZE") {
            if let Ok(size) = size.parse() {
                config.engine.max_file_size = size;
            }
        }
        if let Ok(secs) = std::env::var("CONVERT_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.engine.convert_timeout = Duration::from_secs(secs);
            }
        }
        if let Ok(host) = std::env::var("SMTP_HOST") {
            config.smtp.host = host;
        }
        if let Ok(port) = std::env::var("SMTP_PORT") {
            if let Ok(port) = port.parse() {
                config.smtp.port = port;
            }
        }
        if let Ok(user) = std::env::var("SMTP_USER") {
            config.smtp.user = user;
        }
        if let Ok(pass) = std::env::var("SMTP_PASS") {
            config.smtp.password = pass;
        }
        if let Ok(from) = std::env::var("SMTP_FROM") {
            config.smtp.from = from;
        }

        config
    }
}
