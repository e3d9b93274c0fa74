//! Authentication error types.

use thiserror::Error;

use unibazaar_core::{CredentialError, EmailError, PhoneError};

use crate::api::ApiError;
use crate::storage::StorageError;

/// Errors that can occur during authentication operations.
///
/// Validation variants are raised before any request leaves the process;
/// `Api` carries backend rejections and transport failures unchanged.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The login form is not a well-formed credential combination.
    #[error("invalid login form: {0}")]
    Credential(#[from] CredentialError),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Invalid phone number format.
    #[error("invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneError),

    /// A required registration field is absent or blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Password confirmation does not match.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Backend request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Durable session storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
