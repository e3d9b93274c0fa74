//! Product and store browsing commands.

use unibazaar_core::{CategoryId, ProductId, StoreId};

use unibazaar_client::Market;
use unibazaar_client::api::ApiError;
use unibazaar_client::catalog::ProductQuery;

/// List products matching the given filters.
#[allow(clippy::print_stdout)]
pub async fn list_products(
    market: &Market,
    search: Option<String>,
    category: Option<i32>,
    store: Option<i32>,
) -> Result<(), ApiError> {
    let query = ProductQuery {
        search,
        category: category.map(CategoryId::new),
        store: store.map(StoreId::new),
    };

    let products = market.catalog().products(&query).await?;

    if products.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    for product in &products {
        println!(
            "#{:<6} {:<40} {:>8}  (store {})",
            product.id,
            product.name,
            product.price.to_string(),
            product.store_id
        );
    }
    Ok(())
}

/// Show one product in full.
#[allow(clippy::print_stdout)]
pub async fn show_product(market: &Market, id: i32) -> Result<(), ApiError> {
    let product = market.catalog().product(ProductId::new(id)).await?;

    println!("{} (#{})", product.name, product.id);
    println!("Price: {}", product.price);
    if let Some(description) = &product.description {
        println!("{description}");
    }
    if let Some(stock) = product.stock {
        println!("In stock: {stock}");
    }
    Ok(())
}

/// List all stores.
#[allow(clippy::print_stdout)]
pub async fn list_stores(market: &Market) -> Result<(), ApiError> {
    let stores = market.catalog().stores().await?;

    if stores.is_empty() {
        println!("No stores found.");
        return Ok(());
    }

    for store in &stores {
        println!("#{:<6} {:<40} (owner {})", store.id, store.name, store.owner_id);
    }
    Ok(())
}

/// Show one store in full.
#[allow(clippy::print_stdout)]
pub async fn show_store(market: &Market, id: i32) -> Result<(), ApiError> {
    let store = market.catalog().store(StoreId::new(id)).await?;

    println!("{} (#{})", store.name, store.id);
    if let Some(description) = &store.description {
        println!("{description}");
    }
    Ok(())
}
