//! UniBazaar client - typed client and state layer for the campus
//! marketplace backend.
//!
//! The backend owns every record; this crate owns the client-side view of
//! it: a JSON/HTTP [`api::ApiClient`], an invalidation-based
//! [`cache::QueryCache`], durable session persistence
//! ([`storage::SessionStore`]), and explicit state with operations as
//! methods ([`auth::AuthState`], [`cart::CartState`]).
//!
//! # Modules
//!
//! - [`api`] - HTTP client for the backend's JSON endpoints
//! - [`auth`] - authentication state: login, registration, OTP, logout
//! - [`cache`] - process-wide keyed cache of server data
//! - [`cart`] - per-user cart state with derived count/total
//! - [`catalog`] - product, category, and store queries
//! - [`orders`] - checkout and order history
//! - [`storage`] - durable `user`/`token` persistence
//!
//! All of it hangs off a single cheaply-cloneable [`Market`] handle:
//!
//! ```rust,no_run
//! use unibazaar_client::{Market, config::ClientConfig};
//! use unibazaar_core::LoginForm;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let market = Market::new(ClientConfig::from_env()?);
//! let user = market
//!     .auth()
//!     .login(LoginForm::with_email("student@campus.edu", "hunter2!"))
//!     .await?;
//! market.cart().add_to_cart(7.into(), 2).await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod cache;
pub mod cart;
pub mod catalog;
pub mod config;
mod geo;
pub mod models;
pub mod orders;
pub mod session;
mod state;
pub mod storage;

pub use state::Market;
