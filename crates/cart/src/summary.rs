//! Order summary shown next to the cart: subtotal, shipping, tax, total.

use rust_decimal::Decimal;
use serde::Serialize;

use sanekey_core::{Price, PriceError};

use crate::store::CartSnapshot;

/// Default tax rate (18%).
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Totals derived from a cart snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub subtotal: Price,
    /// Shipping is free.
    pub shipping: Price,
    pub tax: Price,
    pub grand_total: Price,
    pub item_count: u64,
}

impl OrderSummary {
    /// Compute the summary for a snapshot at `tax_rate`.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the tax or grand total cannot be represented.
    pub fn from_snapshot(snapshot: &CartSnapshot, tax_rate: Decimal) -> Result<Self, PriceError> {
        let subtotal = snapshot.total;
        let shipping = Price::zero(subtotal.currency_code);
        let tax = subtotal.scaled(tax_rate)?;
        let grand_total = subtotal.checked_add(shipping)?.checked_add(tax)?;

        Ok(Self {
            subtotal,
            shipping,
            tax,
            grand_total,
            item_count: snapshot.item_count,
        })
    }
}
