//! User account record.

use serde::{Deserialize, Serialize};

use unibazaar_core::{Email, PhoneNumber, UserId, UserRole};

/// A marketplace user.
///
/// Owned by the backend; the client holds a cached copy in durable storage
/// plus an in-memory mirror, kept consistent at every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: Email,
    /// Phone number, when one was registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<PhoneNumber>,
    /// Account role.
    #[serde(default)]
    pub role: UserRole,
}
