use std::sync::Arc;

use tracing::{info, warn};

use shared_config::AppConfig;
use shared_database::{DocumentStore, MemoryStore, StoreError, SupabaseStore};

/// Shared handler state: configuration plus the injected store handle.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}

pub fn connect_store(config: &AppConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    if config.has_database() {
        info!("Using PostgREST document store at {}", config.database_url);
        Ok(Arc::new(SupabaseStore::new(config)?))
    } else {
        warn!("No database configured, data will not survive a restart");
        Ok(Arc::new(MemoryStore::new()))
    }
}
