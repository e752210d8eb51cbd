use std::sync::Arc;

use site_lake_core::PageStore;

use crate::config::AppConfig;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    store: Arc<dyn PageStore>,
    config: AppConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn PageStore>, config: AppConfig) -> Self {
        Self {
            inner: Arc::new(InnerState { store, config }),
        }
    }

    pub fn store(&self) -> &dyn PageStore {
        self.inner.store.as_ref()
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }
}
