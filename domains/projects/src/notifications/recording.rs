//! Dispatcher that keeps notifications in memory

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use lingodesk_common::{Error, Result};
use uuid::Uuid;

use super::NotificationDispatcher;
use crate::domain::events::ProjectNotification;

/// Captures every dispatched notification, optionally failing afterwards
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    sent: Arc<Mutex<Vec<ProjectNotification>>>,
    failing: bool,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record notifications but report every dispatch as failed
    pub fn new_failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn notifications(&self) -> Vec<ProjectNotification> {
        self.lock().clone()
    }

    pub fn notifications_for(&self, recipient: Uuid) -> Vec<ProjectNotification> {
        self.lock()
            .iter()
            .filter(|n| n.recipient() == recipient)
            .cloned()
            .collect()
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ProjectNotification>> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn dispatch(&self, notification: &ProjectNotification) -> Result<()> {
        self.lock().push(notification.clone());
        if self.failing {
            return Err(Error::Internal(format!(
                "dispatch of {} failed",
                notification.name()
            )));
        }
        Ok(())
    }
}
