//! Order record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use unibazaar_core::{OrderId, OrderStatus, Price, UserId};

/// A checked-out order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// User who placed the order.
    pub user_id: UserId,
    /// Lifecycle status.
    #[serde(default)]
    pub status: OrderStatus,
    /// Order total, decimal text on the wire.
    pub total: Price,
    /// Placement timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
