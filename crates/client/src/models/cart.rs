//! Cart line item record.

use serde::{Deserialize, Serialize};

use unibazaar_core::{CartItemId, Price, ProductId};

use super::product::Product;

/// A pending-purchase line item.
///
/// Quantity 0 does not imply removal - the backend keeps the line until it
/// is deleted explicitly. A missing quantity on the wire counts as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Unique line item ID.
    pub id: CartItemId,
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Units requested.
    #[serde(default)]
    pub quantity: u32,
    /// Product snapshot embedded by the backend, including price.
    pub product: Product,
}

impl CartItem {
    /// Line total: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.line_total(self.quantity)
    }
}
