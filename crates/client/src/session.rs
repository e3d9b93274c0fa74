//! In-memory session handle.
//!
//! The single mirror of "who is logged in", shared between the auth, cart,
//! and order state. Writes go through [`crate::auth::AuthState`] only.

use std::sync::{Arc, PoisonError, RwLock};

use unibazaar_core::UserId;

use crate::models::User;

/// Shared handle to the current in-memory user.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<Option<User>>>,
}

impl Session {
    /// Snapshot of the current user, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// ID of the current user, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|user| user.id)
    }

    /// Whether a user is logged in.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Replace the current user.
    pub(crate) fn set(&self, user: User) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
    }

    /// Drop the current user.
    pub(crate) fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
