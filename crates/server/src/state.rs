//! Application state shared across handlers.

use std::sync::Arc;

use statewise_engine::StateEngine;

use crate::config::ServerConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// state engine and configuration. The engine is constructed once at
/// startup and injected here - there are no module-level singletons, so
/// tests can build isolated instances.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    engine: StateEngine,
}

impl AppState {
    /// Create a new application state around an engine.
    #[must_use]
    pub fn new(config: ServerConfig, engine: StateEngine) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, engine }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the state engine.
    #[must_use]
    pub fn engine(&self) -> &StateEngine {
        &self.inner.engine
    }
}
