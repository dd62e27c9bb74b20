//! Integration tests for the Sanekey cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sanekey-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_lifecycle` - File-backed cart across simulated browser sessions
//! - `cart_properties` - Property tests for merge, removal and totals
//! - `checkout_flow` - Checkout against the simulated payment gateway
//!
//! This library only holds shared fixtures.

use rust_decimal::Decimal;
use sanekey_cart::InMemoryCatalog;
use sanekey_core::{Category, CurrencyCode, Price, Product, ProductRef};

/// Product references present in [`demo_catalog`].
pub const DEMO_REFS: [&str; 4] = ["P1", "P2", "P3", "P4"];

/// Unit price in paise for each of [`DEMO_REFS`].
pub const DEMO_PRICES_PAISE: [i64; 4] = [100_000, 25_000, 9_950, 1];

/// A small catalog with prices that exercise decimal places.
#[must_use]
pub fn demo_catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(DEMO_REFS.iter().zip(DEMO_PRICES_PAISE).map(|(id, paise)| {
        Product {
            id: ProductRef::new(*id),
            name: format!("Demo {id}"),
            price: inr_paise(paise),
            original_price: None,
            category: Category::Sale,
            image: format!("/img/{id}.jpg"),
            description: None,
            in_stock: true,
        }
    }))
}

/// An INR price from a paise amount.
#[must_use]
pub fn inr_paise(paise: i64) -> Price {
    Price::new(Decimal::new(paise, 2), CurrencyCode::INR)
}

/// Unit price of a demo product, in paise.
#[must_use]
pub fn demo_price_paise(id: &str) -> Option<i64> {
    DEMO_REFS
        .iter()
        .zip(DEMO_PRICES_PAISE)
        .find_map(|(r, p)| (*r == id).then_some(p))
}
