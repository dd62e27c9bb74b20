//! Cart display data.
//!
//! Display fields (name, category, image) are looked up in the catalog when
//! the view is built, so the stored cart never carries stale copies of them.

use serde::Serialize;

use sanekey_core::{CurrencyCode, Price, Product};

use crate::catalog::ProductCatalog;
use crate::store::{CartSnapshot, LineItem};
use crate::summary::OrderSummary;

/// Cart item display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_ref: String,
    pub title: String,
    pub category: Option<String>,
    pub image: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub original_price: Option<String>,
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub shipping: String,
    pub tax: String,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    /// An empty cart priced in `currency`.
    #[must_use]
    pub fn empty(currency: CurrencyCode) -> Self {
        let zero = Price::zero(currency).display();
        Self {
            items: Vec::new(),
            subtotal: zero.clone(),
            shipping: "Free".to_string(),
            tax: zero.clone(),
            total: zero,
            item_count: 0,
        }
    }

    /// Build the view for a snapshot, resolving display fields via `catalog`.
    #[must_use]
    pub fn build(snapshot: &CartSnapshot, summary: &OrderSummary, catalog: &impl ProductCatalog) -> Self {
        Self {
            items: snapshot
                .items
                .iter()
                .map(|line| CartItemView::build(line, catalog.product(&line.product_ref).as_ref()))
                .collect(),
            subtotal: summary.subtotal.display(),
            shipping: if summary.shipping.is_zero() {
                "Free".to_string()
            } else {
                summary.shipping.display()
            },
            tax: summary.tax.display(),
            total: summary.grand_total.display(),
            item_count: summary.item_count,
        }
    }

    /// Whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl CartItemView {
    fn build(line: &LineItem, product: Option<&Product>) -> Self {
        let line_price = line
            .line_total()
            .map_or_else(|_| "-".to_string(), |price| price.display());

        Self {
            product_ref: line.product_ref.to_string(),
            title: product.map_or_else(|| line.product_ref.to_string(), |p| p.name.clone()),
            category: product.map(|p| p.category.to_string()),
            image: product.map(|p| p.image.clone()),
            quantity: line.quantity.get(),
            price: line.unit_price.display(),
            original_price: product
                .and_then(|p| p.original_price)
                .map(|price| price.display()),
            line_price,
        }
    }
}
