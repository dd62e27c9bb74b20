//! Positive line-item quantity.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// Zero or negative input.
    #[error("quantity must be at least 1 (got {0})")]
    NotPositive(i64),
    /// Input larger than a line can hold.
    #[error("quantity {0} exceeds the maximum of {max}", max = u32::MAX)]
    TooLarge(i64),
    /// Adding two quantities exceeded the maximum.
    #[error("combined quantity exceeds the maximum of {max}", max = u32::MAX)]
    Overflow,
}

/// A quantity of at least one unit.
///
/// ## Examples
///
/// ```
/// use sanekey_core::Quantity;
///
/// assert_eq!(Quantity::try_from_i64(2).unwrap().get(), 2);
/// assert!(Quantity::try_from_i64(0).is_err());
/// assert!(Quantity::try_from_i64(-1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Validate a caller-supplied quantity.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::NotPositive` for zero or negative values and
    /// `QuantityError::TooLarge` for values above `u32::MAX`.
    pub fn try_from_i64(value: i64) -> Result<Self, QuantityError> {
        if value <= 0 {
            return Err(QuantityError::NotPositive(value));
        }
        u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or(QuantityError::TooLarge(value))
    }

    /// The raw count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0.get()
    }

    /// Sum two quantities.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::Overflow` if the sum exceeds `u32::MAX`.
    pub fn checked_add(&self, other: Self) -> Result<Self, QuantityError> {
        self.0
            .checked_add(other.get())
            .map(Self)
            .ok_or(QuantityError::Overflow)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_and_negative() {
        assert_eq!(
            Quantity::try_from_i64(0),
            Err(QuantityError::NotPositive(0))
        );
        assert_eq!(
            Quantity::try_from_i64(-4),
            Err(QuantityError::NotPositive(-4))
        );
    }

    #[test]
    fn test_rejects_too_large() {
        let big = i64::from(u32::MAX) + 1;
        assert_eq!(Quantity::try_from_i64(big), Err(QuantityError::TooLarge(big)));
    }

    #[test]
    fn test_checked_add() {
        let two = Quantity::try_from_i64(2).unwrap();
        let three = Quantity::try_from_i64(3).unwrap();
        assert_eq!(two.checked_add(three).unwrap().get(), 5);

        let max = Quantity::try_from_i64(i64::from(u32::MAX)).unwrap();
        assert_eq!(max.checked_add(Quantity::ONE), Err(QuantityError::Overflow));
    }

    #[test]
    fn test_deserialize_rejects_zero() {
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert_eq!(serde_json::from_str::<Quantity>("7").unwrap().get(), 7);
    }
}
