//! Application state shared across handlers.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::storage::Persistence;
use crate::stores::Stores;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The storefront serves a single
/// local shopper, so one [`Stores`] bundle sits behind a mutex and every
/// request applies its actions in turn.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    persistence: Persistence,
    stores: Mutex<Stores>,
}

impl AppState {
    /// Create a new application state, hydrating the stores from `persistence`.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog, persistence: Persistence) -> Self {
        let stores = Stores::hydrate(&persistence);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                persistence,
                stores: Mutex::new(stores),
            }),
        }
    }

    /// Default configuration, the built-in catalog and in-memory storage.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            StorefrontConfig::default(),
            Catalog::builtin(),
            Persistence::in_memory(),
        )
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the local storage handle.
    #[must_use]
    pub fn persistence(&self) -> &Persistence {
        &self.inner.persistence
    }

    /// Lock the shopper's stores.
    ///
    /// Never hold the guard across an `.await`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if a previous holder panicked.
    pub fn stores(&self) -> Result<MutexGuard<'_, Stores>, AppError> {
        self.inner
            .stores
            .lock()
            .map_err(|_| AppError::Internal("store lock poisoned".to_string()))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("products", &self.inner.catalog.len())
            .finish_non_exhaustive()
    }
}
