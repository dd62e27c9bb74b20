//! Error types for the cart and checkout, with Sentry reporting helpers.
//!
//! Only caller mistakes (`InvalidQuantity`, `UnknownProduct`, ...) are returned
//! from cart operations. Persistence problems are absorbed by the store and
//! kept as diagnostics.

use thiserror::Error;

use sanekey_core::{CurrencyCode, PaymentStatus, PriceError, ProductRef, QuantityError};

use crate::checkout::GatewayError;
use crate::storage::StorageError;

/// Errors produced by cart operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartError {
    /// Zero, negative or out-of-range quantity.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),

    /// The catalog has no record for the product.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductRef),

    /// The product is priced in a different currency than the cart.
    #[error("product {product} is priced in {found}, cart uses {expected}")]
    CurrencyMismatch {
        product: ProductRef,
        expected: CurrencyCode,
        found: CurrencyCode,
    },

    /// Line or cart total cannot be represented.
    #[error("price error: {0}")]
    Price(#[from] PriceError),

    /// Writing the cart slot failed; in-memory state is unaffected.
    #[error("failed to persist cart: {0}")]
    PersistenceWriteFailed(#[from] StorageError),

    /// The stored cart could not be read back and was discarded.
    #[error("stored cart is corrupt: {0}")]
    PersistenceReadCorrupt(String),
}

/// Errors produced by the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No signed-in user.
    #[error("sign in to check out")]
    NotSignedIn,

    /// Nothing to pay for.
    #[error("your cart is empty")]
    EmptyCart,

    /// The payment provider call failed.
    #[error("payment failed: {0}")]
    Payment(#[from] GatewayError),

    /// The provider answered but did not confirm the payment.
    #[error("payment was not confirmed (status {0:?})")]
    NotConfirmed(PaymentStatus),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

/// Report an absorbed error to Sentry and the log.
///
/// Used for failures that must not reach the caller but should still leave
/// a diagnostic trail.
pub fn report(error: &CartError) {
    let event_id = sentry::capture_error(error);
    tracing::error!(
        error = %error,
        sentry_event_id = %event_id,
        "Cart error absorbed"
    );
}

/// Add a breadcrumb for cart actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of cart
/// changes leading up to an error.
pub fn add_breadcrumb(message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some("cart".to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::UnknownProduct(ProductRef::new("men-9"));
        assert_eq!(err.to_string(), "unknown product: men-9");

        let err = CartError::from(QuantityError::NotPositive(0));
        assert_eq!(
            err.to_string(),
            "invalid quantity: quantity must be at least 1 (got 0)"
        );
    }

    #[test]
    fn test_checkout_error_display() {
        assert_eq!(CheckoutError::EmptyCart.to_string(), "your cart is empty");
        assert_eq!(CheckoutError::NotSignedIn.to_string(), "sign in to check out");
    }

    #[test]
    fn test_report_without_sentry_client_is_harmless() {
        report(&CartError::PersistenceReadCorrupt("bad".to_string()));
        add_breadcrumb("noop", &[("k", "v")]);
    }
}
