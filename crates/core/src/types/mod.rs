//! Core types for UniBazaar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credential;
pub mod email;
pub mod id;
pub mod phone;
pub mod price;
pub mod status;

pub use credential::{CredentialError, LoginCredentials, LoginForm};
pub use email::{Email, EmailError};
pub use id::*;
pub use phone::{PhoneError, PhoneNumber};
pub use price::{Price, PriceError};
pub use status::*;
