//! RocketCart Core - Shared cart types.
//!
//! This crate provides the value types used across all RocketCart components:
//! - `cart` - Cart store library (mutations, stock checks, persistence)
//! - `cli` - Command-line consumer of the cart store
//!
//! # Architecture
//!
//! The core crate contains only types and their invariants - no I/O, no HTTP
//! clients, no storage. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, quantities, line items, and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
