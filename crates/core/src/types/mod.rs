//! Core types for RocketCart.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod quantity;
pub mod stock;

pub use cart::{Cart, CartInvariantError, LineItem};
pub use id::*;
pub use price::Price;
pub use product::Product;
pub use quantity::Quantity;
pub use stock::StockRecord;
