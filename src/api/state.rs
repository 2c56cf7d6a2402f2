//! Application state for the Distribution Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::{ConfigLoader, EngineSettings};
use crate::error::EngineResult;
use crate::store::DistributionStore;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// engine settings and the injected storage collaborator.
#[derive(Clone)]
pub struct AppState {
    /// The engine settings.
    settings: Arc<EngineSettings>,
    /// The storage collaborator.
    store: Arc<dyn DistributionStore>,
}

impl AppState {
    /// Creates a new application state over the given store.
    pub fn new(settings: EngineSettings, store: impl DistributionStore + 'static) -> Self {
        Self {
            settings: Arc::new(settings),
            store: Arc::new(store),
        }
    }

    /// Creates the state from a loaded configuration and its data snapshot.
    pub fn from_config(config: &ConfigLoader) -> EngineResult<Self> {
        let store = config.load_store()?;
        Ok(Self::new(config.settings().clone(), store))
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the storage collaborator.
    pub fn store(&self) -> &dyn DistributionStore {
        self.store.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_app_state_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AppState>();
    }

    #[test]
    fn test_from_config_loads_sample_snapshot() {
        let config = ConfigLoader::load("./config/sample").unwrap();
        let state = AppState::from_config(&config).unwrap();

        assert_eq!(state.settings().max_query_days, 3660);
        assert_eq!(state.store().profiles().unwrap().len(), 3);
    }

    #[test]
    fn test_new_with_empty_store() {
        let state = AppState::new(EngineSettings::default(), InMemoryStore::default());
        assert!(state.store().profiles().unwrap().is_empty());
    }
}
