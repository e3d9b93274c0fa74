//! Cart commands.

use unibazaar_core::{CartItemId, ProductId};

use unibazaar_client::Market;
use unibazaar_client::api::ApiError;

/// Show line items with the derived count and total.
#[allow(clippy::print_stdout)]
pub async fn show(market: &Market) -> Result<(), ApiError> {
    let items = market.cart().items().await?;

    if items.is_empty() {
        println!("Cart is empty.");
        return Ok(());
    }

    for item in &items {
        println!(
            "#{:<6} {:<40} {:>3} x {:>8} = {:>9}",
            item.id,
            item.product.name,
            item.quantity,
            item.product.price.to_string(),
            item.line_total().to_string(),
        );
    }

    println!(
        "{} item(s), total {}",
        market.cart().count().await?,
        market.cart().total().await?
    );
    Ok(())
}

/// Add a product to the cart.
#[allow(clippy::print_stdout)]
pub async fn add(market: &Market, product_id: i32, quantity: u32) -> Result<(), ApiError> {
    if !market.auth().is_logged_in() {
        println!("Log in first; adding to the cart needs a user.");
        return Ok(());
    }

    market
        .cart()
        .add_to_cart(ProductId::new(product_id), quantity)
        .await?;
    println!("Added product {product_id} x{quantity}.");
    Ok(())
}

/// Set the absolute quantity on a line item.
#[allow(clippy::print_stdout)]
pub async fn set_quantity(market: &Market, item_id: i32, quantity: u32) -> Result<(), ApiError> {
    market
        .cart()
        .update_quantity(CartItemId::new(item_id), quantity)
        .await?;
    println!("Line {item_id} set to quantity {quantity}.");
    Ok(())
}

/// Remove a line item.
#[allow(clippy::print_stdout)]
pub async fn remove(market: &Market, item_id: i32) -> Result<(), ApiError> {
    market
        .cart()
        .remove_from_cart(CartItemId::new(item_id))
        .await?;
    println!("Line {item_id} removed.");
    Ok(())
}

/// Remove every line item.
#[allow(clippy::print_stdout)]
pub async fn clear(market: &Market) -> Result<(), ApiError> {
    market.cart().clear_cart().await?;
    println!("Cart cleared.");
    Ok(())
}
