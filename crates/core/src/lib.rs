//! Sanekey Core - Shared types library.
//!
//! This crate provides the domain types used across the Sanekey components:
//! - `cart` - Cart store, catalog, checkout orchestration
//! - `cli` - Command-line front end for a local cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no payment clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Keys, quantities, prices, products, and payment enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
