//! services/intake/src/console/state.rs
//!
//! Defines the application's shared state for one CLI invocation.

use crate::adapters::{GuidanceSettings, JsonFileStore, OpenAiGuidanceAdapter};
use crate::config::Config;
use crate::error::AppError;
use std::sync::Arc;
use symptom_guide_core::{GuidanceService, KeyValueStore, LocalState, PortResult};

/// Created once at startup and passed to every command.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub guidance: Arc<dyn GuidanceService>,
    pub store: Arc<dyn KeyValueStore>,
}

impl AppState {
    /// Wires the production adapters from configuration.
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let settings = GuidanceSettings::from_config(&config)?;
        let guidance = Arc::new(OpenAiGuidanceAdapter::new(settings));
        let store = Arc::new(JsonFileStore::new(config.data_dir.clone()));
        Ok(Self {
            config: Arc::new(config),
            guidance,
            store,
        })
    }

    /// Reads theme, consent and history from local storage.
    pub fn load_local_state(&self) -> PortResult<LocalState> {
        LocalState::load(self.store.clone())
    }
}
