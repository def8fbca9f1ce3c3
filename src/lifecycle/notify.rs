//! # Notification Dispatcher
//!
//! Best-effort side-channel messages on document creation. Dispatch failure
//! is the engine's problem to log, never the caller's problem to see.

use thiserror::Error;

/// Notification dispatch failure
#[derive(Debug, Clone, Error)]
#[error("Notification dispatch failed: {0}")]
pub struct NotifyError(pub String);

/// Notification dispatcher trait
pub trait NotificationDispatcher: Send + Sync {
    /// Deliver a message to `address`
    fn notify(&self, address: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// SMTP configuration
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP server host
    pub host: String,

    /// SMTP server port
    pub port: u16,

    /// SMTP username
    pub user: String,

    /// SMTP password (should come from secrets)
    pub password: String,

    /// From address
    pub from: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1025,
            user: String::new(),
            password: String::new(),
            from: "noreply@docvault.local".to_string(),
        }
    }
}

/// SMTP-backed dispatcher
pub struct SmtpDispatcher {
    config: SmtpConfig,
}

impl SmtpDispatcher {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }
}

impl NotificationDispatcher for SmtpDispatcher {
    fn notify(&self, address: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        use lettre::{
            message::header::ContentType,
            transport::smtp::authentication::Credentials,
            Message, SmtpTransport, Transport,
        };

        let email = Message::builder()
            .from(
                self.config
                    .from
                    .parse()
                    .map_err(|e| NotifyError(format!("invalid from address: {}", e)))?,
            )
            .to(address
                .parse()
                .map_err(|e| NotifyError(format!("invalid to address: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| NotifyError(format!("failed to build message: {}", e)))?;

        let mut builder = SmtpTransport::builder_dangerous(&self.config.host)
            .port(self.config.port);
        if !self.config.user.is_empty() {
            builder = builder.credentials(Credentials::new(
                self.config.user.clone(),
                self.config.password.clone(),
            ));
        }

        builder
            .build()
            .send(&email)
            .map_err(|e| NotifyError(format!("smtp send failed: {}", e)))?;

        Ok(())
    }
}

/// Mock dispatcher for tests
#[derive(Debug, Default)]
pub struct MockDispatcher {
    /// Sent (address, subject, body) triples
    pub sent: std::sync::Mutex<Vec<(String, String, String)>>,
    /// When true, every dispatch fails
    pub fail: std::sync::atomic::AtomicBool,
}

impl MockDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let mock = Self::default();
        mock.fail.store(true, std::sync::atomic::Ordering::SeqCst);
        mock
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl NotificationDispatcher for MockDispatcher {
    fn notify(&self, address: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(NotifyError("mock dispatch failure".to_string()));
        }
        self.sent.lock().unwrap().push((
            address.to_string(),
            subject.to_string(),
            body.to_string(),
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_sent() {
        let mock = MockDispatcher::new();
        mock.notify("user@example.com", "Document Created", "body")
            .unwrap();

        assert_eq!(mock.sent_count(), 1);
        let sent = mock.sent.lock().unwrap();
        assert_eq!(sent[0].0, "user@example.com");
        assert_eq!(sent[0].1, "Document Created");
    }

    #[test]
    fn test_mock_failure_records_nothing() {
        let mock = MockDispatcher::failing();
        assert!(mock.notify("user@example.com", "s", "b").is_err());
        assert_eq!(mock.sent_count(), 0);
    }
}
