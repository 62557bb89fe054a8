//! Shared application state.

use crate::config::Config;
use keel_core::ProjectStore;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

/// Shared application state.
pub struct AppState {
    store: Mutex<ProjectStore>,
}

impl AppState {
    /// Open the configured store and import legacy watch directories if it is empty.
    pub fn new(config: &Config) -> keel_core::Result<Self> {
        let mut store = ProjectStore::open(&config.projects_dir)?;
        if let Some(project) = store.import_legacy(&config.legacy_watch_dirs)? {
            info!(target: "keel::startup", "Created legacy project: {}", project.name);
        }
        Ok(Self::with_store(store))
    }

    pub fn with_store(store: ProjectStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Exclusive access to the store. Handlers must not hold it across an await.
    pub fn store(&self) -> MutexGuard<'_, ProjectStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
