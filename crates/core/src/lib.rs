//! Simple Shop Core - Shared types library.
//!
//! This crate provides common types used across all Simple Shop components:
//! - `storefront` - Public-facing shop and admin panel
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! framework dependencies. This keeps it lightweight and allows it to be
//! used anywhere, including tests that never touch the network.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs
//! - [`cart`] - The session cart store and its quantity/total arithmetic

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartLine, ProductSnapshot};
pub use types::*;
