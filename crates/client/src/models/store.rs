//! Student store record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use unibazaar_core::{StoreId, UserId};

/// A student-run store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Unique store ID.
    pub id: StoreId,
    /// User who owns this store.
    pub owner_id: UserId,
    /// Store name.
    pub name: String,
    /// Storefront blurb.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
