//! Checkout and order-history commands.

use unibazaar_client::Market;
use unibazaar_client::api::ApiError;
use unibazaar_client::orders::OrderError;

/// Create an order from the current cart.
#[allow(clippy::print_stdout)]
pub async fn checkout(market: &Market) -> Result<(), OrderError> {
    let order = market.orders().checkout().await?;
    println!(
        "Order #{} placed: total {}, status {}",
        order.id, order.total, order.status
    );
    Ok(())
}

/// List the current user's orders.
#[allow(clippy::print_stdout)]
pub async fn list(market: &Market) -> Result<(), ApiError> {
    let orders = market.orders().my_orders().await?;

    if orders.is_empty() {
        println!("No orders yet.");
        return Ok(());
    }

    for order in &orders {
        println!(
            "#{:<6} {:>9}  {}",
            order.id,
            order.total.to_string(),
            order.status
        );
    }
    Ok(())
}
