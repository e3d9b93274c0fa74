//! Product and category records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use unibazaar_core::{CategoryId, Price, ProductId, StoreId};

/// A product listed by a student store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Store offering this product.
    pub store_id: StoreId,
    /// Category, when the seller assigned one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    /// Product name.
    pub name: String,
    /// Long-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unit price, decimal text on the wire.
    pub price: Price,
    /// Primary image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Units in stock, when the seller tracks it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    /// Listing timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Category name.
    pub name: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_parsed_from_text() {
        let product: Product = serde_json::from_str(
            r#"{"id":7,"storeId":1,"name":"Used calculus textbook","price":"9.99"}"#,
        )
        .unwrap();
        assert_eq!(product.price, Price::parse("9.99").unwrap());
        assert!(product.category_id.is_none());
    }
}
