//! Mock Email Service Implementation
//!
//! Provides in-memory email capture for testing without external dependencies.
//! Lifecycle emails can be looked up by recipient, project and email type.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{EmailError, EmailMessage, EmailReceipt, EmailService};

/// Email captured by the mock service
#[derive(Debug, Clone)]
pub struct CapturedEmail {
    pub message: EmailMessage,
    pub receipt: EmailReceipt,
    pub captured_at: DateTime<Utc>,
}

impl CapturedEmail {
    /// The `email_type` metadata value, if any
    pub fn email_type(&self) -> Option<&str> {
        self.message.metadata.get("email_type").map(String::as_str)
    }

    /// Project the email is about, read from metadata
    pub fn project_id(&self) -> Option<Uuid> {
        self.message
            .metadata
            .get("project_id")
            .and_then(|id| Uuid::parse_str(id).ok())
    }
}

/// How the mock responds to sends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Capture,
    Disabled,
    Failing,
}

/// Mock email service for testing
#[derive(Debug, Clone)]
pub struct MockEmailService {
    emails: Arc<Mutex<Vec<CapturedEmail>>>,
    default_from: String,
    app_base_url: String,
    mode: Mode,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockEmailService {
    /// Create a new mock email service
    pub fn new() -> Self {
        Self::with_base_url(
            "projects@lingodesk.io".to_string(),
            "https://lingodesk.io".to_string(),
        )
    }

    /// Create a mock using the given sender and link base URL
    pub fn with_base_url(default_from: String, app_base_url: String) -> Self {
        Self {
            emails: Arc::new(Mutex::new(Vec::new())),
            default_from,
            app_base_url,
            mode: Mode::Capture,
        }
    }

    /// Acknowledge every send without capturing it
    pub fn new_disabled() -> Self {
        Self {
            mode: Mode::Disabled,
            ..Self::new()
        }
    }

    /// Create a mock whose every send fails with a provider error
    pub fn new_failing() -> Self {
        Self {
            mode: Mode::Failing,
            ..Self::new()
        }
    }

    /// Get emails sent to a specific recipient
    pub fn get_emails_for_recipient(&self, email: &str) -> Vec<CapturedEmail> {
        lock(&self.emails)
            .iter()
            .filter(|e| e.message.to == email)
            .cloned()
            .collect()
    }

    /// Get the most recent email of `email_type` sent to a recipient
    pub fn get_latest_email_of_type(&self, email: &str, email_type: &str) -> Option<CapturedEmail> {
        self.get_emails_for_recipient(email)
            .into_iter()
            .filter(|e| e.email_type() == Some(email_type))
            .max_by_key(|e| e.captured_at)
    }

    /// Get every email sent about a project, in send order
    pub fn get_emails_for_project(&self, project_id: Uuid) -> Vec<CapturedEmail> {
        lock(&self.emails)
            .iter()
            .filter(|e| e.project_id() == Some(project_id))
            .cloned()
            .collect()
    }

    /// Get count of emails sent
    pub fn email_count(&self) -> usize {
        lock(&self.emails).len()
    }

    pub fn clear(&self) {
        lock(&self.emails).clear();
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EmailService for MockEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        match self.mode {
            Mode::Disabled => {
                tracing::warn!("Mock email service disabled, skipping send");
                return Ok(EmailReceipt {
                    message_id: format!("disabled-{}", Uuid::new_v4()),
                    sent_at: Utc::now(),
                    provider: "mock-disabled".to_string(),
                });
            }
            Mode::Failing => {
                return Err(EmailError::AwsSes(format!(
                    "Mock delivery failure to {}",
                    message.to
                )));
            }
            Mode::Capture => {}
        }

        tracing::info!(to = %message.to, "Mock email service capturing email");

        let receipt = EmailReceipt {
            message_id: format!("mock-{}", Uuid::new_v4()),
            sent_at: Utc::now(),
            provider: "mock".to_string(),
        };

        lock(&self.emails).push(CapturedEmail {
            message,
            receipt: receipt.clone(),
            captured_at: Utc::now(),
        });

        Ok(receipt)
    }

    fn default_from(&self) -> String {
        self.default_from.clone()
    }

    fn app_base_url(&self) -> &str {
        &self.app_base_url
    }
}
