//! Wire models for backend records.
//!
//! The backend speaks camelCase JSON; every model here mirrors that shape
//! exactly so a fetched record round-trips untouched.

pub mod cart;
pub mod order;
pub mod product;
pub mod store;
pub mod user;

pub use cart::CartItem;
pub use order::Order;
pub use product::{Category, Product};
pub use store::Store;
pub use user::User;
