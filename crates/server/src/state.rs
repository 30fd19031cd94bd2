//! Application state shared across handlers.

use crate::auth::AccessPolicy;
use bodega_core::config::AppConfig;
use bodega_storage::ObjectStore;
use std::sync::Arc;

/// Shared application state. Handlers are stateless beyond this; nothing
/// here caches across requests.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Object storage backend.
    pub storage: Arc<dyn ObjectStore>,
    /// Capability check evaluated before every route.
    pub auth: Arc<dyn AccessPolicy>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn ObjectStore>,
        auth: Arc<dyn AccessPolicy>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            storage,
            auth,
        }
    }
}
