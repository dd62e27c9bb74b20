//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::quantity::Quantity;

/// Errors from price arithmetic.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Two prices in different currencies were combined.
    #[error("cannot combine {left} and {right} amounts")]
    CurrencyMismatch {
        /// Currency of the left-hand operand.
        left: CurrencyCode,
        /// Currency of the right-hand operand.
        right: CurrencyCode,
    },
    /// The result does not fit in a decimal.
    #[error("price arithmetic overflowed")]
    Overflow,
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., rupees, not paise).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Price of `quantity` units at this unit price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the product does not fit.
    pub fn times(&self, quantity: Quantity) -> Result<Self, PriceError> {
        self.amount
            .checked_mul(Decimal::from(quantity.get()))
            .map(|amount| Self::new(amount, self.currency_code))
            .ok_or(PriceError::Overflow)
    }

    /// Sum two prices of the same currency.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::CurrencyMismatch` for different currencies and
    /// `PriceError::Overflow` if the sum does not fit.
    pub fn checked_add(&self, other: Self) -> Result<Self, PriceError> {
        if self.currency_code != other.currency_code {
            return Err(PriceError::CurrencyMismatch {
                left: self.currency_code,
                right: other.currency_code,
            });
        }
        self.amount
            .checked_add(other.amount)
            .map(|amount| Self::new(amount, self.currency_code))
            .ok_or(PriceError::Overflow)
    }

    /// Scale by a rate (e.g., a tax rate), rounded half-up to two decimal places.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the product does not fit.
    pub fn scaled(&self, rate: Decimal) -> Result<Self, PriceError> {
        self.amount
            .checked_mul(rate)
            .map(|amount| {
                Self::new(
                    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
                    self.currency_code,
                )
            })
            .ok_or(PriceError::Overflow)
    }

    /// Whether the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Format for display (e.g., "₹1299.00").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::INR => "₹",
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::INR => "INR",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INR" => Ok(Self::INR),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            other => Err(format!("unsupported currency code '{other}'")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn inr(amount: &str) -> Price {
        Price::new(amount.parse().unwrap(), CurrencyCode::INR)
    }

    #[test]
    fn test_times_quantity() {
        let unit = inr("499.50");
        let qty = Quantity::try_from_i64(3).unwrap();
        assert_eq!(unit.times(qty).unwrap(), inr("1498.50"));
    }

    #[test]
    fn test_checked_add_same_currency() {
        assert_eq!(inr("0.10").checked_add(inr("0.20")).unwrap(), inr("0.30"));
    }

    #[test]
    fn test_checked_add_rejects_mixed_currency() {
        let usd = Price::new(Decimal::ONE, CurrencyCode::USD);
        assert!(matches!(
            inr("1").checked_add(usd),
            Err(PriceError::CurrencyMismatch {
                left: CurrencyCode::INR,
                right: CurrencyCode::USD
            })
        ));
    }

    #[test]
    fn test_scaled_rounds_to_cents() {
        let rate: Decimal = "0.18".parse().unwrap();
        assert_eq!(inr("99.99").scaled(rate).unwrap(), inr("18.00"));
    }

    #[test]
    fn test_display() {
        assert_eq!(inr("1299").display(), "₹1299.00");
        assert_eq!(Price::zero(CurrencyCode::GBP).to_string(), "£0.00");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("usd".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_serde_amount_as_string() {
        let json = serde_json::to_string(&inr("12.50")).unwrap();
        assert_eq!(json, r#"{"amount":"12.50","currencyCode":"INR"}"#);
    }
}
