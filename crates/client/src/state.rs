//! Application state shared across the client surface.

use crate::api::ApiClient;
use crate::auth::AuthState;
use crate::cache::QueryCache;
use crate::cart::CartState;
use crate::catalog::Catalog;
use crate::config::ClientConfig;
use crate::orders::Orders;
use crate::session::Session;
use crate::storage::SessionStore;

/// The marketplace client.
///
/// Binds the API client, query cache, durable storage, and every state
/// object over one shared session. Cheaply cloneable; UI layers hold one
/// handle and call operations as methods.
#[derive(Debug, Clone)]
pub struct Market {
    config: ClientConfig,
    api: ApiClient,
    cache: QueryCache,
    auth: AuthState,
    cart: CartState,
    catalog: Catalog,
    orders: Orders,
}

impl Market {
    /// Create a client and restore any persisted session.
    ///
    /// Restoration is optimistic: a stored user is trusted until the next
    /// authenticated request fails, and a corrupt entry is discarded.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let api = ApiClient::new(&config);
        let cache = QueryCache::new();
        let store = SessionStore::new(config.state_dir.clone());
        let session = Session::default();

        let auth = AuthState::new(
            api.clone(),
            cache.clone(),
            store,
            session.clone(),
            &config,
        );
        auth.restore();

        let cart = CartState::new(api.clone(), cache.clone(), session.clone());
        let catalog = Catalog::new(api.clone(), cache.clone());
        let orders = Orders::new(api.clone(), cache.clone(), session);

        Self {
            config,
            api,
            cache,
            auth,
            cart,
            catalog,
            orders,
        }
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Get a reference to the query cache.
    #[must_use]
    pub const fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Get a reference to the authentication state.
    #[must_use]
    pub const fn auth(&self) -> &AuthState {
        &self.auth
    }

    /// Get a reference to the cart state.
    #[must_use]
    pub const fn cart(&self) -> &CartState {
        &self.cart
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get a reference to the checkout/orders client.
    #[must_use]
    pub const fn orders(&self) -> &Orders {
        &self.orders
    }
}
