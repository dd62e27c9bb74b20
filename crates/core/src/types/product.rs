//! Product records supplied by the catalog.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::ProductRef;
use super::price::Price;

/// Storefront category a product is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Women,
    Men,
    Accessories,
    Sale,
    GiftCard,
}

impl Category {
    /// Slug used in URLs and serialized records.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Women => "women",
            Self::Men => "men",
            Self::Accessories => "accessories",
            Self::Sale => "sale",
            Self::GiftCard => "gift-card",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// A product as the catalog describes it.
///
/// The cart only ever reads `id` and `price`; the rest is display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductRef,
    pub name: String,
    pub price: Price,
    /// Pre-discount price, shown struck through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    pub category: Category,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

const fn default_in_stock() -> bool {
    true
}
