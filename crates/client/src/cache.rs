//! Process-wide query cache.
//!
//! Keyed cache of server data using `moka` (5-minute TTL). Mutations never
//! write into it directly - they invalidate the affected key and the next
//! read refetches from the backend. Cart entries are keyed by user id so a
//! different or returning user can never observe a stale cart.

use std::time::Duration;

use moka::future::Cache;

use unibazaar_core::{CategoryId, ProductId, StoreId, UserId};

use crate::models::{CartItem, Category, Order, Product, Store};

/// Cache key for backend queries.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    /// One user's cart.
    Cart(UserId),
    /// A product listing page, parameterized by its filters.
    Products {
        category: Option<CategoryId>,
        store: Option<StoreId>,
    },
    /// A single product.
    Product(ProductId),
    /// All categories.
    Categories,
    /// All stores.
    Stores,
    /// A single store.
    Store(StoreId),
    /// One user's order history.
    Orders(UserId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Cart(Vec<CartItem>),
    Products(Vec<Product>),
    Product(Box<Product>),
    Categories(Vec<Category>),
    Stores(Vec<Store>),
    Store(Box<Store>),
    Orders(Vec<Order>),
}

/// Process-wide keyed cache of server data.
#[derive(Clone)]
pub struct QueryCache {
    cache: Cache<CacheKey, CacheValue>,
}

impl QueryCache {
    const MAX_CAPACITY: u64 = 1000;
    const TIME_TO_LIVE: Duration = Duration::from_secs(300); // 5 minutes

    /// Create a new query cache.
    #[must_use]
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(Self::MAX_CAPACITY)
            .time_to_live(Self::TIME_TO_LIVE)
            .build();

        Self { cache }
    }

    /// Look up a cached value.
    pub async fn get(&self, key: &CacheKey) -> Option<CacheValue> {
        self.cache.get(key).await
    }

    /// Store a freshly fetched value.
    pub async fn insert(&self, key: CacheKey, value: CacheValue) {
        self.cache.insert(key, value).await;
    }

    /// Mark one key stale, forcing the next read to refetch.
    pub async fn invalidate(&self, key: &CacheKey) {
        self.cache.invalidate(key).await;
    }

    /// Mark every cached value stale.
    pub async fn invalidate_all(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}
