//! Business logic services for the cart.
//!
//! # Services
//!
//! - `cart` - The cart store: add, remove, and set-quantity mutations
//! - `notifier` - Fire-and-forget delivery of failure notices

pub mod cart;
pub mod notifier;
