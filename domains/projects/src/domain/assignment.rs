//! Translator assignment policy

use std::sync::Arc;

use async_trait::async_trait;
use lingodesk_common::Result;
use lingodesk_users::{User, UserDirectory};

/// Chooses the translator for a freshly created project
#[async_trait]
pub trait AssignmentPolicy: Send + Sync {
    /// `None` when nobody translates `language`
    async fn select_translator(&self, language: &str) -> Result<Option<User>>;
}

/// Picks the first translator in directory order
pub struct FirstAvailable {
    directory: Arc<dyn UserDirectory>,
}

impl FirstAvailable {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl AssignmentPolicy for FirstAvailable {
    async fn select_translator(&self, language: &str) -> Result<Option<User>> {
        let candidates = self.directory.get_translators_by_language(language).await?;
        tracing::debug!(
            language = %language,
            candidates = candidates.len(),
            "Selecting translator"
        );
        Ok(candidates.into_iter().next())
    }
}
