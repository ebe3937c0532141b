//! Delivery of project notifications

pub mod email;
pub mod recording;

use async_trait::async_trait;
use lingodesk_common::Result;

use crate::domain::events::ProjectNotification;

pub use email::EmailNotificationDispatcher;
pub use recording::RecordingDispatcher;

/// Consumes notifications after the state write they describe has succeeded
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, notification: &ProjectNotification) -> Result<()>;
}
