//! Checkout and order history.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::api::types::CheckoutRequest;
use crate::api::{ApiClient, ApiError};
use crate::cache::{CacheKey, CacheValue, QueryCache};
use crate::models::Order;
use crate::session::Session;

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Checkout requires a logged-in user.
    #[error("not logged in")]
    NotLoggedIn,

    /// Backend request failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Checkout and order-history client.
#[derive(Clone)]
pub struct Orders {
    inner: Arc<OrdersInner>,
}

struct OrdersInner {
    api: ApiClient,
    cache: QueryCache,
    session: Session,
}

impl std::fmt::Debug for Orders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orders").finish_non_exhaustive()
    }
}

impl Orders {
    /// Create the orders client over shared handles.
    pub(crate) fn new(api: ApiClient, cache: QueryCache, session: Session) -> Self {
        Self {
            inner: Arc::new(OrdersInner {
                api,
                cache,
                session,
            }),
        }
    }

    /// Create an order from the current user's cart.
    ///
    /// Invalidates both the cart and order keys: the cart is consumed on
    /// the backend, and the history gained an entry.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotLoggedIn` without a user; otherwise
    /// propagates backend rejections and transport failures.
    pub async fn checkout(&self) -> Result<Order, OrderError> {
        let Some(user_id) = self.inner.session.user_id() else {
            return Err(OrderError::NotLoggedIn);
        };

        let request = CheckoutRequest { user_id };
        let order: Order = self.inner.api.post("/api/checkout", &request).await?;
        info!(order_id = %order.id, total = %order.total, "order placed");

        self.inner.cache.invalidate(&CacheKey::Cart(user_id)).await;
        self.inner
            .cache
            .invalidate(&CacheKey::Orders(user_id))
            .await;

        Ok(order)
    }

    /// Order history for the current user. Empty when logged out.
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and transport failures.
    pub async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        let Some(user_id) = self.inner.session.user_id() else {
            return Ok(Vec::new());
        };

        let key = CacheKey::Orders(user_id);
        if let Some(CacheValue::Orders(orders)) = self.inner.cache.get(&key).await {
            debug!("cache hit for orders");
            return Ok(orders);
        }

        let orders: Vec<Order> = self
            .inner
            .api
            .get("/api/orders", &[("userId", user_id.to_string())])
            .await?;

        self.inner
            .cache
            .insert(key, CacheValue::Orders(orders.clone()))
            .await;

        Ok(orders)
    }
}
