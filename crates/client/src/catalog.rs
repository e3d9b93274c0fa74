//! Catalog queries and seller-side mutations.
//!
//! Browse/search reads go through the query cache (search results are
//! never cached); create/update/delete invalidate the affected keys.
//! Filtered listings that a mutation cannot name individually simply age
//! out with the cache TTL.

use std::sync::Arc;

use tracing::debug;

use unibazaar_core::{CategoryId, ProductId, StoreId};

use crate::api::types::{NewProduct, NewStore, ProductUpdate, StoreUpdate};
use crate::api::{ApiClient, ApiError};
use crate::cache::{CacheKey, CacheValue, QueryCache};
use crate::models::{Category, Product, Store};

/// Filters for a product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Free-text search over name and description.
    pub search: Option<String>,
    /// Restrict to one category.
    pub category: Option<CategoryId>,
    /// Restrict to one store.
    pub store: Option<StoreId>,
}

impl ProductQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some(category) = self.category {
            params.push(("categoryId", category.to_string()));
        }
        if let Some(store) = self.store {
            params.push(("storeId", store.to_string()));
        }
        params
    }
}

/// Catalog client: products, categories, stores.
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    api: ApiClient,
    cache: QueryCache,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog").finish_non_exhaustive()
    }
}

impl Catalog {
    /// Create the catalog client over shared handles.
    pub(crate) fn new(api: ApiClient, cache: QueryCache) -> Self {
        Self {
            inner: Arc::new(CatalogInner { api, cache }),
        }
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List products matching `query`. Search results bypass the cache.
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and transport failures.
    pub async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        let key = CacheKey::Products {
            category: query.category,
            store: query.store,
        };

        if query.search.is_none()
            && let Some(CacheValue::Products(products)) = self.inner.cache.get(&key).await
        {
            debug!("cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self.inner.api.get("/api/products", &query.params()).await?;

        if query.search.is_none() {
            self.inner
                .cache
                .insert(key, CacheValue::Products(products.clone()))
                .await;
        }

        Ok(products)
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and transport failures.
    pub async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("cache hit for product");
            return Ok(*product);
        }

        let product: Product = self
            .inner
            .api
            .get(&format!("/api/products/{id}"), &[])
            .await?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// List a new product.
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and transport failures.
    pub async fn create_product(&self, new_product: &NewProduct) -> Result<Product, ApiError> {
        let product: Product = self.inner.api.post("/api/products", new_product).await?;
        self.invalidate_product_keys(product.id, Some(product.store_id))
            .await;
        Ok(product)
    }

    /// Update an existing product. Absent fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and transport failures.
    pub async fn update_product(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, ApiError> {
        let product: Product = self
            .inner
            .api
            .put(&format!("/api/products/{id}"), update)
            .await?;
        self.invalidate_product_keys(id, Some(product.store_id))
            .await;
        Ok(product)
    }

    /// Delete a product listing.
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and transport failures.
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        self.inner.api.delete(&format!("/api/products/{id}")).await?;
        self.invalidate_product_keys(id, None).await;
        Ok(())
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and transport failures.
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self.inner.api.get("/api/categories", &[]).await?;

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }

    // =========================================================================
    // Stores
    // =========================================================================

    /// List all stores.
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and transport failures.
    pub async fn stores(&self) -> Result<Vec<Store>, ApiError> {
        if let Some(CacheValue::Stores(stores)) = self.inner.cache.get(&CacheKey::Stores).await {
            debug!("cache hit for stores");
            return Ok(stores);
        }

        let stores: Vec<Store> = self.inner.api.get("/api/stores", &[]).await?;

        self.inner
            .cache
            .insert(CacheKey::Stores, CacheValue::Stores(stores.clone()))
            .await;

        Ok(stores)
    }

    /// Get a single store.
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and transport failures.
    pub async fn store(&self, id: StoreId) -> Result<Store, ApiError> {
        let key = CacheKey::Store(id);
        if let Some(CacheValue::Store(store)) = self.inner.cache.get(&key).await {
            debug!("cache hit for store");
            return Ok(*store);
        }

        let store: Store = self.inner.api.get(&format!("/api/stores/{id}"), &[]).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Store(Box::new(store.clone())))
            .await;

        Ok(store)
    }

    /// Open a new store for the current user.
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and transport failures.
    pub async fn create_store(&self, new_store: &NewStore) -> Result<Store, ApiError> {
        let store: Store = self.inner.api.post("/api/stores", new_store).await?;
        self.invalidate_store_keys(store.id).await;
        Ok(store)
    }

    /// Update a store. Absent fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and transport failures.
    pub async fn update_store(&self, id: StoreId, update: &StoreUpdate) -> Result<Store, ApiError> {
        let store: Store = self
            .inner
            .api
            .put(&format!("/api/stores/{id}"), update)
            .await?;
        self.invalidate_store_keys(id).await;
        Ok(store)
    }

    /// Close a store.
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and transport failures.
    pub async fn delete_store(&self, id: StoreId) -> Result<(), ApiError> {
        self.inner.api.delete(&format!("/api/stores/{id}")).await?;
        self.invalidate_store_keys(id).await;
        Ok(())
    }

    /// Invalidate the keys a product mutation can name: the product itself,
    /// the unfiltered listing, and the owning store's listing.
    async fn invalidate_product_keys(&self, id: ProductId, store: Option<StoreId>) {
        self.inner.cache.invalidate(&CacheKey::Product(id)).await;
        self.inner
            .cache
            .invalidate(&CacheKey::Products {
                category: None,
                store: None,
            })
            .await;
        if let Some(store) = store {
            self.inner
                .cache
                .invalidate(&CacheKey::Products {
                    category: None,
                    store: Some(store),
                })
                .await;
        }
    }

    async fn invalidate_store_keys(&self, id: StoreId) {
        self.inner.cache.invalidate(&CacheKey::Store(id)).await;
        self.inner.cache.invalidate(&CacheKey::Stores).await;
    }
}
