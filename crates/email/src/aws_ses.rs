//! SES delivery
//!
//! With `aws_endpoint_url` set the client talks to LocalStack using fixed
//! dummy credentials.

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_ses::config::SharedCredentialsProvider;
use aws_sdk_ses::types::{Body, Content, Destination, Message};
use aws_sdk_ses::Client as SesClient;
use chrono::Utc;

use crate::{EmailConfig, EmailError, EmailMessage, EmailReceipt, EmailService};

pub struct SesEmailService {
    client: SesClient,
    config: EmailConfig,
}

impl SesEmailService {
    pub async fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let region = config
            .aws_region
            .clone()
            .unwrap_or_else(|| "us-east-1".to_string());

        let aws_config = match config.aws_endpoint_url.as_ref() {
            Some(endpoint_url) => {
                tracing::info!(endpoint_url = %endpoint_url, "Using custom AWS endpoint");

                // For LocalStack, use dummy credentials
                let credentials = Credentials::new(
                    "test-access-key",
                    "test-secret-key",
                    None,
                    None,
                    "localstack-email-provider",
                );

                aws_config::defaults(BehaviorVersion::latest())
                    .region(Region::new(region.clone()))
                    .endpoint_url(endpoint_url)
                    .credentials_provider(SharedCredentialsProvider::new(credentials))
                    .load()
                    .await
            }
            None => {
                // Use default AWS configuration (real AWS)
                aws_config::defaults(BehaviorVersion::latest())
                    .region(Region::new(region.clone()))
                    .load()
                    .await
            }
        };

        let client = SesClient::new(&aws_config);

        // LocalStack may not have SES configured yet, so a failed quota check only warns
        match client.get_send_quota().send().await {
            Ok(_) => tracing::info!(region = %region, "Connected to AWS SES"),
            Err(e) => tracing::warn!(error = %e, "SES send quota check failed"),
        }

        Ok(Self { client, config })
    }

    /// Convert email message to SES format
    fn build_ses_message(&self, message: &EmailMessage) -> Result<Message, EmailError> {
        let subject = Content::builder()
            .data(&message.subject)
            .charset("UTF-8")
            .build()
            .map_err(|e| EmailError::AwsSes(format!("Failed to build subject: {}", e)))?;

        let text_content = Content::builder()
            .data(&message.body_text)
            .charset("UTF-8")
            .build()
            .map_err(|e| EmailError::AwsSes(format!("Failed to build text content: {}", e)))?;

        let mut body_builder = Body::builder().text(text_content);

        // Add HTML content if provided
        if let Some(html_body) = &message.body_html {
            let html_content = Content::builder()
                .data(html_body)
                .charset("UTF-8")
                .build()
                .map_err(|e| EmailError::AwsSes(format!("Failed to build HTML content: {}", e)))?;

            body_builder = body_builder.html(html_content);
        }

        Ok(Message::builder()
            .subject(subject)
            .body(body_builder.build())
            .build())
    }

    fn build_destination(&self, to: &str) -> Destination {
        Destination::builder().to_addresses(to).build()
    }
}

#[async_trait::async_trait]
impl EmailService for SesEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        tracing::info!(to = %message.to, "Sending email via AWS SES");

        if !message.to.contains('@') || !message.from.contains('@') {
            return Err(EmailError::Validation(format!(
                "Invalid email address: {} -> {}",
                message.from, message.to
            )));
        }

        let ses_message = self.build_ses_message(&message)?;
        let destination = self.build_destination(&message.to);

        let result = self
            .client
            .send_email()
            .source(&message.from)
            .destination(destination)
            .message(ses_message)
            .send()
            .await
            .map_err(|e| EmailError::AwsSes(format!("Failed to send email: {}", e)))?;

        let message_id = result.message_id().to_string();

        tracing::info!(message_id = %message_id, "Email sent via SES");

        Ok(EmailReceipt {
            message_id,
            sent_at: Utc::now(),
            provider: "aws-ses".to_string(),
        })
    }

    fn default_from(&self) -> String {
        self.config.default_from.clone()
    }

    fn app_base_url(&self) -> &str {
        &self.config.app_base_url
    }
}
