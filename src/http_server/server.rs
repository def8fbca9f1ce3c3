//! # HTTP Server
//!
//! Assembles the routers and their injected dependencies. Each collaborator
//! is constructed once here and passed down; nothing reads global state after
//! startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::auth::crypto::PasswordPolicy;
use crate::auth::jwt::JwtManager;
use crate::auth::service::AuthService;
use crate::auth::user::InMemoryUserRepository;
use crate::file_storage::local::LocalBackend;
use crate::lifecycle::audit::InMemoryAuditLog;
use crate::lifecycle::convert::PandocConverter;
use crate::lifecycle::document::InMemoryDocumentRepository;
use crate::lifecycle::engine::LifecycleEngine;
use crate::lifecycle::notify::SmtpDispatcher;
use crate::lifecycle::version::InMemoryVersionStore;
use crate::observability::logger::{Logger, Severity};

use super::auth_routes::{auth_routes, AuthState};
use super::config::ServiceConfig;
use super::document_routes::{document_routes, DocumentState};

/// HTTP server for the document service
pub struct HttpServer {
    config: ServiceConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new server with default configuration
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::default())
    }

    /// Create a new server with custom configuration
    pub fn with_config(config: ServiceConfig) -> Self {
        let router = Self::build_router(&config);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &ServiceConfig) -> Router {
        let users = Arc::new(InMemoryUserRepository::new());
        let jwt = JwtManager::new(config.jwt.clone());

        let auth_state = Arc::new(AuthState {
            service: AuthService::new(
                Arc::clone(&users) as Arc<dyn crate::auth::user::UserRepository>,
                jwt.clone(),
                PasswordPolicy::default(),
            ),
        });

        let engine = LifecycleEngine::new(
            Arc::new(InMemoryDocumentRepository::new()),
            Arc::new(InMemoryVersionStore::new()),
            Arc::new(InMemoryAuditLog::new()),
            users,
            Arc::new(LocalBackend::new(PathBuf::from(&config.upload_dir))),
            Arc::new(PandocConverter::new()),
            Arc::new(SmtpDispatcher::new(config.smtp.clone())),
            config.engine.clone(),
        );
        let document_state = Arc::new(DocumentState { engine, jwt });

        let cors = if config.http.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            use tower_http::cors::AllowOrigin;
            let origins: Vec<_> = config
                .http
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .route("/health", get(health_handler))
            .nest("/api/auth", auth_routes(auth_state))
            .nest("/api/documents", document_routes(document_state))
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.http.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .http
            .socket_addr()
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("{}", e)))?;

        Logger::log(
            Severity::Info,
            "server_started",
            &[("addr", &addr.to_string())],
        );

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

impl Default for HttpServer {
    fn default() -> Self {
        Self::new()
    }
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
