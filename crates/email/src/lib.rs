//! Project lifecycle email delivery
//!
//! `EmailService` renders the lifecycle templates in [`content`] and hands the
//! message to SES (LocalStack locally) or to the in-memory mock.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

pub mod aws_ses;
pub mod content;
pub mod mock;

pub use content::ProjectEmailKind;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Email configuration error: {0}")]
    Configuration(String),

    #[error("Email validation error: {0}")]
    Validation(String),

    #[error("AWS SES error: {0}")]
    AwsSes(String),
}

/// Outgoing message; `metadata` tags it with the email type and project
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl EmailMessage {
    pub fn new(
        to: impl Into<String>,
        from: impl Into<String>,
        subject: impl Into<String>,
        body_text: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            subject: subject.into(),
            body_text: body_text.into(),
            body_html: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_html(self, body_html: impl Into<String>) -> Self {
        Self {
            body_html: Some(body_html.into()),
            ..self
        }
    }

    pub fn tagged(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }
}

/// Provider acknowledgement of a send
#[derive(Debug, Clone)]
pub struct EmailReceipt {
    pub message_id: String,
    pub sent_at: DateTime<Utc>,
    pub provider: String,
}

/// Delivery backend named by EMAIL_PROVIDER
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailProvider {
    Ses,
    Mock,
}

impl FromStr for EmailProvider {
    type Err = EmailError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ses" | "aws-ses" => Ok(Self::Ses),
            "mock" => Ok(Self::Mock),
            other => Err(EmailError::Configuration(format!(
                "Unknown email provider: {} (expected ses or mock)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub provider: EmailProvider,
    pub aws_region: Option<String>,
    /// Set for LocalStack
    pub aws_endpoint_url: Option<String>,
    pub default_from: String,
    /// When false every send is acknowledged and dropped
    pub enabled: bool,
    /// Prefix of the project links in email bodies
    pub app_base_url: String,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl EmailConfig {
    /// Read EMAIL_PROVIDER, FROM_EMAIL, EMAIL_ENABLED, APP_BASE_URL and the AWS settings
    pub fn from_env() -> Result<Self, EmailError> {
        dotenvy::dotenv().ok();

        let provider = env_or("EMAIL_PROVIDER", "mock").parse()?;
        let default_from = env_or("FROM_EMAIL", "projects@lingodesk.io");
        if !default_from.contains('@') {
            return Err(EmailError::Configuration(format!(
                "FROM_EMAIL is not an email address: {}",
                default_from
            )));
        }

        Ok(Self {
            provider,
            aws_region: std::env::var("AWS_REGION").ok(),
            aws_endpoint_url: std::env::var("AWS_ENDPOINT_URL").ok(),
            default_from,
            enabled: env_or("EMAIL_ENABLED", "true").parse().unwrap_or(true),
            app_base_url: env_or("APP_BASE_URL", "https://lingodesk.io")
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

#[async_trait::async_trait]
pub trait EmailService: Send + Sync {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError>;

    fn default_from(&self) -> String;

    fn app_base_url(&self) -> &str;

    /// Render a lifecycle template for one recipient and send it
    async fn send_project_email(
        &self,
        recipient_email: &str,
        recipient_name: &str,
        project_id: Uuid,
        project_name: &str,
        language: &str,
        kind: &ProjectEmailKind,
    ) -> Result<EmailReceipt, EmailError> {
        let project_url = format!("{}/projects/{}", self.app_base_url(), project_id);
        let email = content::ProjectEmail {
            recipient_name,
            project_name,
            language,
            project_url: &project_url,
            kind,
        };

        let message = EmailMessage::new(
            recipient_email,
            self.default_from(),
            content::subject(&email),
            content::body_text(&email),
        )
        .with_html(content::body_html(&email))
        .tagged("email_type", kind.email_type())
        .tagged("project_id", project_id);

        self.send_email(message).await
    }
}

/// Picks the delivery backend from `EmailConfig`
pub struct EmailServiceFactory;

impl EmailServiceFactory {
    pub async fn create(config: EmailConfig) -> Result<Arc<dyn EmailService>, EmailError> {
        if !config.enabled {
            tracing::info!("Email delivery disabled");
            return Ok(Arc::new(mock::MockEmailService::new_disabled()));
        }

        tracing::info!(provider = ?config.provider, "Creating email service");
        Ok(match config.provider {
            EmailProvider::Ses => Arc::new(aws_ses::SesEmailService::new(config).await?),
            EmailProvider::Mock => Arc::new(mock::MockEmailService::with_base_url(
                config.default_from,
                config.app_base_url,
            )),
        })
    }
}
