//! Role matrix tests
//!
//! Viewer mutations always fail FORBIDDEN, Admin passes every gate, and a
//! missing or invalid identity fails UNAUTHENTICATED before any gate is
//! consulted.

mod common;

use common::{text_document, Harness};
use docvault::auth::errors::AuthError;
use docvault::auth::jwt::{JwtConfig, JwtManager};
use docvault::lifecycle::engine::UpdateDocument;
use docvault::lifecycle::errors::LifecycleError;

#[tokio::test]
async fn test_viewer_mutations_are_forbidden() {
    let h = Harness::new();
    let doc = h
        .engine
        .create(text_document("Matrix"), h.editor)
        .await
        .unwrap();

    let create = h.engine.create(text_document("Nope"), h.viewer).await;
    assert!(matches!(create, Err(LifecycleError::Forbidden(_))));

    let update = h
        .engine
        .update(doc.id, UpdateDocument::default(), h.viewer)
        .await;
    assert!(matches!(update, Err(LifecycleError::Forbidden(_))));

    let delete = h.engine.delete(doc.id, h.viewer).await;
    assert!(matches!(delete, Err(LifecycleError::Forbidden(_))));

    let audit = h.engine.list_audit_logs(doc.id, h.viewer).await;
    assert!(matches!(audit, Err(LifecycleError::Forbidden(_))));
}

#[tokio::test]
async fn test_viewer_reads_are_allowed() {
    let h = Harness::new();
    let doc = h
        .engine
        .create(text_document("Readable"), h.editor)
        .await
        .unwrap();

    assert!(h.engine.read(doc.id, h.viewer).await.is_ok());
    assert!(h.engine.list(h.viewer).await.is_ok());
    assert!(h.engine.list_versions(doc.id, h.viewer).await.is_ok());
    assert!(h
        .engine
        .convert(doc.id, "pdf".to_string(), h.viewer)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_editor_cannot_delete_or_read_audit() {
    let h = Harness::new();
    let doc = h
        .engine
        .create(text_document("Editable"), h.editor)
        .await
        .unwrap();

    assert!(matches!(
        h.engine.delete(doc.id, h.editor).await,
        Err(LifecycleError::Forbidden(_))
    ));
    assert!(matches!(
        h.engine.list_audit_logs(doc.id, h.editor).await,
        Err(LifecycleError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_admin_passes_every_gate() {
    let h = Harness::new();
    let doc = h
        .engine
        .create(text_document("Root"), h.admin)
        .await
        .unwrap();

    assert!(h.engine.read(doc.id, h.admin).await.is_ok());
    assert!(h.engine.list(h.admin).await.is_ok());
    assert!(h
        .engine
        .update(doc.id, UpdateDocument::default(), h.admin)
        .await
        .is_ok());
    assert!(h
        .engine
        .convert(doc.id, "pdf".to_string(), h.admin)
        .await
        .is_ok());
    assert!(h.engine.list_versions(doc.id, h.admin).await.is_ok());
    assert!(h.engine.list_audit_logs(doc.id, h.admin).await.is_ok());
    assert!(h.engine.delete(doc.id, h.admin).await.is_ok());
}

#[test]
fn test_invalid_token_is_rejected_before_any_gate() {
    let jwt = JwtManager::new(JwtConfig::default());

    // Garbage token
    assert!(matches!(
        jwt.authenticate("garbage"),
        Err(AuthError::MalformedToken)
    ));

    // Token signed with a different secret
    let other = JwtManager::new(JwtConfig {
        secret: "some-other-secret-key-entirely".to_string(),
        ..Default::default()
    });
    let user = docvault::auth::user::User::new(
        "forger@example.com".to_string(),
        "Forger".to_string(),
        "password123",
        docvault::auth::user::Role::Admin,
        &docvault::auth::crypto::PasswordPolicy::default(),
    )
    .unwrap();
    let forged = other.generate_token(&user).unwrap();
    assert!(jwt.authenticate(&forged).is_err());
}

#[test]
fn test_forbidden_and_unauthenticated_are_distinct() {
    assert_ne!(
        LifecycleError::Unauthenticated.status_code(),
        LifecycleError::Forbidden("delete").status_code()
    );
}
