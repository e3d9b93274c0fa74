//! Cart state.
//!
//! Per-user view of pending-purchase line items, meaningful only while a
//! user is authenticated. Mutations never touch the cache directly: each
//! success invalidates that user's cart key and the next read refetches.
//!
//! Overlapping mutations are not serialized or de-duplicated; both
//! complete, both invalidate, and the last response to land decides the
//! final cached state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use unibazaar_core::{CartItemId, Price, ProductId};

use crate::api::types::{AddCartItemRequest, UpdateCartItemRequest};
use crate::api::{ApiClient, ApiError};
use crate::cache::{CacheKey, CacheValue, QueryCache};
use crate::models::CartItem;
use crate::session::Session;

/// Cart state for the current user.
///
/// Cheaply cloneable; clones share the same cache and session.
#[derive(Clone)]
pub struct CartState {
    inner: Arc<CartStateInner>,
}

struct CartStateInner {
    api: ApiClient,
    cache: QueryCache,
    session: Session,
    visible: AtomicBool,
}

impl std::fmt::Debug for CartState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartState")
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

impl CartState {
    /// Create the cart state over shared handles.
    pub(crate) fn new(api: ApiClient, cache: QueryCache, session: Session) -> Self {
        Self {
            inner: Arc::new(CartStateInner {
                api,
                cache,
                session,
                visible: AtomicBool::new(false),
            }),
        }
    }

    /// Current line items.
    ///
    /// Fetched only while a user is present - logged out, this is an empty
    /// list without a request. The cache key carries the user id, so a
    /// different user never sees this cart.
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and transport failures.
    pub async fn items(&self) -> Result<Vec<CartItem>, ApiError> {
        let Some(user_id) = self.inner.session.user_id() else {
            return Ok(Vec::new());
        };

        let key = CacheKey::Cart(user_id);
        if let Some(CacheValue::Cart(items)) = self.inner.cache.get(&key).await {
            debug!("cache hit for cart");
            return Ok(items);
        }

        let items: Vec<CartItem> = self
            .inner
            .api
            .get("/api/cart", &[("userId", user_id.to_string())])
            .await?;

        self.inner
            .cache
            .insert(key, CacheValue::Cart(items.clone()))
            .await;

        Ok(items)
    }

    /// Request a line for `product_id`, creating or incrementing it.
    ///
    /// No-op without a logged-in user. Pass `1` for the storefront's
    /// default quantity.
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and transport failures.
    pub async fn add_to_cart(&self, product_id: ProductId, quantity: u32) -> Result<(), ApiError> {
        let Some(user_id) = self.inner.session.user_id() else {
            debug!("add_to_cart without a user is a no-op");
            return Ok(());
        };

        let request = AddCartItemRequest {
            user_id,
            product_id,
            quantity,
        };
        let item: CartItem = self.inner.api.post("/api/cart", &request).await?;
        debug!(cart_item_id = %item.id, "line item added");

        self.inner.cache.invalidate(&CacheKey::Cart(user_id)).await;
        Ok(())
    }

    /// Set the absolute quantity on an existing line.
    ///
    /// Quantity 0 keeps the line; removal is always explicit. The request
    /// is issued regardless of login state - only the per-user cache entry
    /// needs a user to invalidate.
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and transport failures.
    pub async fn update_quantity(
        &self,
        cart_item_id: CartItemId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        let request = UpdateCartItemRequest { quantity };
        let item: CartItem = self
            .inner
            .api
            .put(&format!("/api/cart/{cart_item_id}"), &request)
            .await?;
        debug!(cart_item_id = %item.id, quantity, "line item updated");

        if let Some(user_id) = self.inner.session.user_id() {
            self.inner.cache.invalidate(&CacheKey::Cart(user_id)).await;
        }
        Ok(())
    }

    /// Delete a line item.
    ///
    /// Issued regardless of login state, like
    /// [`update_quantity`](Self::update_quantity).
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and transport failures.
    pub async fn remove_from_cart(&self, cart_item_id: CartItemId) -> Result<(), ApiError> {
        self.inner
            .api
            .delete(&format!("/api/cart/{cart_item_id}"))
            .await?;
        debug!(cart_item_id = %cart_item_id, "line item removed");

        if let Some(user_id) = self.inner.session.user_id() {
            self.inner.cache.invalidate(&CacheKey::Cart(user_id)).await;
        }
        Ok(())
    }

    /// Delete every line item for the current user. No-op without a user.
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and transport failures.
    pub async fn clear_cart(&self) -> Result<(), ApiError> {
        let Some(user_id) = self.inner.session.user_id() else {
            debug!("clear_cart without a user is a no-op");
            return Ok(());
        };

        self.inner
            .api
            .delete(&format!("/api/cart/user/{user_id}"))
            .await?;
        debug!("cart cleared");

        self.inner.cache.invalidate(&CacheKey::Cart(user_id)).await;
        Ok(())
    }

    /// Show the cart panel. Pure visibility toggle, no network effect.
    pub fn open_cart(&self) {
        self.inner.visible.store(true, Ordering::SeqCst);
    }

    /// Hide the cart panel.
    pub fn close_cart(&self) {
        self.inner.visible.store(false, Ordering::SeqCst);
    }

    /// Whether the cart panel is visible.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.visible.load(Ordering::SeqCst)
    }

    /// Total number of units across all lines, recomputed on every access.
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and transport failures.
    pub async fn count(&self) -> Result<u32, ApiError> {
        let items = self.items().await?;
        Ok(items.iter().map(|item| item.quantity).sum())
    }

    /// Sum of price times quantity over all lines, recomputed on every
    /// access. The price text is parsed numerically before multiplying.
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and transport failures.
    pub async fn total(&self) -> Result<Price, ApiError> {
        let items = self.items().await?;
        Ok(items
            .iter()
            .fold(Price::ZERO, |total, item| total + item.line_total()))
    }
}
