//! Document HTTP Routes
//!
//! The thin transport layer over the lifecycle engine. Handlers authenticate
//! the bearer token, hand the engine an [`AuthContext`], and map the error
//! taxonomy onto status codes; all authorization lives behind the engine.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::jwt::{AuthContext, JwtManager};
use crate::lifecycle::audit::AuditEntry;
use crate::lifecycle::engine::{
    ConvertOutcome, CreateDocument, DocumentWithOwner, LifecycleEngine, UpdateDocument,
    VersionWithAuthor,
};
use crate::lifecycle::document::Document;
use crate::lifecycle::errors::LifecycleError;
use crate::observability::logger::{Logger, Severity};

/// Shared document state
pub struct DocumentState {
    pub engine: LifecycleEngine,
    pub jwt: JwtManager,
}

/// Document routes with shared state
pub fn document_routes(state: Arc<DocumentState>) -> Router {
    Router::new()
        .route("/", post(create_handler))
        .route("/", get(list_handler))
        .route("/:id", get(get_handler))
        .route("/:id", put(update_handler))
        .route("/:id", delete(delete_handler))
        .route("/:id/convert", post(convert_handler))
        .route("/:id/versions", get(versions_handler))
        .route("/:id/audit-logs", get(audit_logs_handler))
        .with_state(state)
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    pub target_format: String,
}

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub message: String,
    #[serde(flatten)]
    pub outcome: ConvertOutcome,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn error_reply(err: LifecycleError) -> ErrorReply {
    if matches!(err, LifecycleError::Internal(_)) {
        Logger::log_stderr(
            Severity::Error,
            "internal_error",
            &[("detail", &err.log_detail())],
        );
    }

    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: err.status_code(),
        }),
    )
}

// ==================
// Helper Functions
// ==================

/// Authenticate the bearer token, or fail with 401 before any gate is
/// consulted.
fn authenticate(headers: &HeaderMap, jwt: &JwtManager) -> Result<AuthContext, ErrorReply> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .ok_or_else(|| error_reply(LifecycleError::Unauthenticated))?;

    jwt.authenticate(token)
        .map_err(|_| error_reply(LifecycleError::Unauthenticated))
}

fn parse_id(id: &str) -> Result<Uuid, ErrorReply> {
    Uuid::parse_str(id)
        .map_err(|_| error_reply(LifecycleError::Validation("Invalid document id".to_string())))
}

// ==================
// Handlers
// ==================

/// Create a document from a multipart form: `title`, `format`, `file`
async fn create_handler(
    State(state): State<Arc<DocumentState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Document>), ErrorReply> {
    let ctx = authenticate(&headers, &state.jwt)?;

    let mut title = None;
    let mut format = None;
    let mut file_name = None;
    let mut payload = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error_reply(LifecycleError::Validation(format!("Invalid form data: {}", e)))
    })? {
        let name = field.name().map(String::from);
        match name.as_deref() {
            Some("title") => {
                title = Some(field.text().await.map_err(|e| {
                    error_reply(LifecycleError::Validation(e.to_string()))
                })?);
            }
            Some("format") => {
                format = Some(field.text().await.map_err(|e| {
                    error_reply(LifecycleError::Validation(e.to_string()))
                })?);
            }
            Some("file") => {
                file_name = field.file_name().map(String::from);
                payload = Some(field.bytes().await.map_err(|e| {
                    error_reply(LifecycleError::Validation(e.to_string()))
                })?);
            }
            _ => {}
        }
    }

    let request = CreateDocument {
        title: title
            .ok_or_else(|| error_reply(LifecycleError::Validation("Missing title".to_string())))?,
        format: format
            .ok_or_else(|| error_reply(LifecycleError::Validation("Missing format".to_string())))?,
        file_name: file_name.unwrap_or_else(|| "upload".to_string()),
        payload: payload
            .ok_or_else(|| {
                error_reply(LifecycleError::Validation("No file uploaded".to_string()))
            })?
            .to_vec(),
    };

    let document = state
        .engine
        .create(request, ctx)
        .await
        .map_err(error_reply)?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// List all documents
async fn list_handler(
    State(state): State<Arc<DocumentState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<DocumentWithOwner>>, ErrorReply> {
    let ctx = authenticate(&headers, &state.jwt)?;
    let documents = state.engine.list(ctx).await.map_err(error_reply)?;
    Ok(Json(documents))
}

/// Get a single document
async fn get_handler(
    State(state): State<Arc<DocumentState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<DocumentWithOwner>, ErrorReply> {
    let ctx = authenticate(&headers, &state.jwt)?;
    let id = parse_id(&id)?;
    let document = state.engine.read(id, ctx).await.map_err(error_reply)?;
    Ok(Json(document))
}

/// Update a document
async fn update_handler(
    State(state): State<Arc<DocumentState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<UpdateRequest>,
) -> Result<Json<Document>, ErrorReply> {
    let ctx = authenticate(&headers, &state.jwt)?;
    let id = parse_id(&id)?;

    let document = state
        .engine
        .update(
            id,
            UpdateDocument {
                title: request.title,
                content: request.content,
            },
            ctx,
        )
        .await
        .map_err(error_reply)?;
    Ok(Json(document))
}

/// Delete a document
async fn delete_handler(
    State(state): State<Arc<DocumentState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ErrorReply> {
    let ctx = authenticate(&headers, &state.jwt)?;
    let id = parse_id(&id)?;

    state.engine.delete(id, ctx).await.map_err(error_reply)?;
    Ok(Json(DeleteResponse {
        message: "Document deleted successfully".to_string(),
    }))
}

/// Convert a document to another format
async fn convert_handler(
    State(state): State<Arc<DocumentState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<ConvertRequest>,
) -> Result<Json<ConvertResponse>, ErrorReply> {
    let ctx = authenticate(&headers, &state.jwt)?;
    let id = parse_id(&id)?;

    let outcome = state
        .engine
        .convert(id, request.target_format, ctx)
        .await
        .map_err(error_reply)?;
    Ok(Json(ConvertResponse {
        message: "Document converted successfully".to_string(),
        outcome,
    }))
}

/// List a document's versions, newest first
async fn versions_handler(
    State(state): State<Arc<DocumentState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Vec<VersionWithAuthor>>, ErrorReply> {
    let ctx = authenticate(&headers, &state.jwt)?;
    let id = parse_id(&id)?;

    let versions = state
        .engine
        .list_versions(id, ctx)
        .await
        .map_err(error_reply)?;
    Ok(Json(versions))
}

/// List a document's audit entries, newest first (Admin only)
async fn audit_logs_handler(
    State(state): State<Arc<DocumentState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Vec<AuditEntry>>, ErrorReply> {
    let ctx = authenticate(&headers, &state.jwt)?;
    let id = parse_id(&id)?;

    let entries = state
        .engine
        .list_audit_logs(id, ctx)
        .await
        .map_err(error_reply)?;
    Ok(Json(entries))
}
