//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::EcosaveConfig;
use crate::db::Database;
use crate::openai::{OpenAiError, TipClient};

/// Application state shared across all handlers.
///
/// Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    db: Database,
    tips: TipClient,
}

impl AppState {
    /// Build the state from configuration and an opened backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the tip client cannot be constructed.
    pub fn new(config: &EcosaveConfig, db: Database) -> Result<Self, OpenAiError> {
        let tips = TipClient::new(&config.openai)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { db, tips }),
        })
    }

    #[must_use]
    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    #[must_use]
    pub fn tips(&self) -> &TipClient {
        &self.inner.tips
    }
}
