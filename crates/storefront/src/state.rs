//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::shop::ShopClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the shop backend client. It is the single top-level
/// container for shared state; nothing global or ambient.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    shop: ShopClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let shop = ShopClient::new(&config.backend);

        Self {
            inner: Arc::new(AppStateInner { config, shop }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the shop backend client.
    #[must_use]
    pub fn shop(&self) -> &ShopClient {
        &self.inner.shop
    }
}
