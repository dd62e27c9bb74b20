//! The cart store.
//!
//! A store is created in the `Uninitialized` state ([`PendingCart`]) and
//! becomes a usable [`CartStore`] exactly once, by hydrating from storage.
//! Mutations are only defined on the ready store, so there is no way to touch
//! the cart before hydration has run.
//!
//! Every mutation writes the whole line-item collection back to the storage
//! slot as a JSON array:
//!
//! ```json
//! [{"productRef": "P1", "quantity": 5, "unitPrice": {"amount": "1000", "currencyCode": "INR"}}]
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use sanekey_core::{CurrencyCode, Price, PriceError, ProductRef, Quantity};

use crate::catalog::ProductCatalog;
use crate::error::{self, CartError, Result};
use crate::storage::{Storage, StorageError};

/// Storage slot used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "sanekey-cart";

/// Most diagnostics a store keeps; older ones are dropped first.
pub const MAX_DIAGNOSTICS: usize = 16;

/// Per-store settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSettings {
    /// Storage slot holding the serialized cart.
    pub storage_key: String,
    /// Currency every line must be priced in.
    pub currency: CurrencyCode,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            currency: CurrencyCode::default(),
        }
    }
}

/// One row of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_ref: ProductRef,
    pub quantity: Quantity,
    /// Catalog price read when the line was last added to or updated.
    pub unit_price: Price,
}

impl LineItem {
    /// Unit price times quantity.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the amount cannot be represented.
    pub fn line_total(&self) -> std::result::Result<Price, PriceError> {
        self.unit_price.times(self.quantity)
    }
}

/// Read-only view of the cart with derived totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: Vec<LineItem>,
    pub total: Price,
    pub item_count: u64,
}

impl CartSnapshot {
    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Lifecycle state of a cart store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartState {
    /// Created, hydration not yet run.
    Uninitialized,
    /// Hydration attempted; mutations accepted. Terminal.
    Ready,
}

/// Outcome of [`CartStore::update_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line's quantity was replaced.
    Updated,
    /// The requested quantity was zero or negative and the line was removed.
    Removed,
    /// No line for the product; nothing changed.
    Missing,
}

// =============================================================================
// Uninitialized
// =============================================================================

/// A cart store that has not hydrated yet.
#[derive(Debug)]
pub struct PendingCart<S, C> {
    storage: S,
    catalog: C,
    settings: CartSettings,
}

impl<S: Storage, C: ProductCatalog> PendingCart<S, C> {
    /// Always [`CartState::Uninitialized`].
    #[must_use]
    pub const fn state(&self) -> CartState {
        CartState::Uninitialized
    }

    /// Restore the cart from storage and make it ready.
    ///
    /// A missing slot gives an empty cart. An unreadable or malformed slot is
    /// discarded: the cart starts empty and a `PersistenceReadCorrupt`
    /// diagnostic is recorded. Hydration never fails.
    #[instrument(skip(self), fields(key = %self.settings.storage_key))]
    pub fn hydrate(self) -> CartStore<S, C> {
        let mut diagnostics = Vec::new();

        let items = match self.storage.get_item(&self.settings.storage_key) {
            Ok(None) => {
                tracing::debug!("No stored cart, starting empty");
                Vec::new()
            }
            Ok(Some(raw)) => match parse_stored(&raw, self.settings.currency) {
                Ok(items) => {
                    tracing::info!(lines = items.len(), "Cart restored from storage");
                    items
                }
                Err(reason) => {
                    tracing::warn!(%reason, "Discarding corrupt stored cart");
                    diagnostics.push(CartError::PersistenceReadCorrupt(reason));
                    Vec::new()
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored cart, starting empty");
                diagnostics.push(CartError::PersistenceReadCorrupt(e.to_string()));
                Vec::new()
            }
        };

        CartStore {
            storage: self.storage,
            catalog: self.catalog,
            settings: self.settings,
            items,
            diagnostics,
        }
    }
}

/// Parse a stored slot, enforcing the same invariants mutations maintain.
fn parse_stored(raw: &str, currency: CurrencyCode) -> std::result::Result<Vec<LineItem>, String> {
    let items: Vec<LineItem> = serde_json::from_str(raw).map_err(|e| e.to_string())?;

    let mut seen = HashSet::new();
    for item in &items {
        if !seen.insert(item.product_ref.as_str()) {
            return Err(format!("duplicate line for product {}", item.product_ref));
        }
        if item.unit_price.currency_code != currency {
            return Err(format!(
                "line for product {} is priced in {}, cart uses {currency}",
                item.product_ref, item.unit_price.currency_code
            ));
        }
    }
    total_of(&items, currency).map_err(|e| e.to_string())?;

    Ok(items)
}

fn total_of(items: &[LineItem], currency: CurrencyCode) -> std::result::Result<Price, PriceError> {
    items.iter().try_fold(Price::zero(currency), |sum, item| {
        sum.checked_add(item.line_total()?)
    })
}

// =============================================================================
// Ready
// =============================================================================

/// The authoritative cart for one browsing session.
///
/// Single owner, synchronous: every operation runs to completion and writes
/// the result to storage before returning.
#[derive(Debug)]
pub struct CartStore<S, C> {
    storage: S,
    catalog: C,
    settings: CartSettings,
    items: Vec<LineItem>,
    diagnostics: Vec<CartError>,
}

impl<S: Storage, C: ProductCatalog> CartStore<S, C> {
    /// Create a store in the `Uninitialized` state.
    pub fn create(storage: S, catalog: C, settings: CartSettings) -> PendingCart<S, C> {
        PendingCart {
            storage,
            catalog,
            settings,
        }
    }

    /// Always [`CartState::Ready`].
    #[must_use]
    pub const fn state(&self) -> CartState {
        CartState::Ready
    }

    /// Add `quantity` units of a product.
    ///
    /// Merges into the existing line for the product, or appends a new line.
    /// The unit price is read from the catalog.
    ///
    /// # Errors
    ///
    /// - `InvalidQuantity` if `quantity` is zero, negative, or the merged
    ///   quantity overflows
    /// - `UnknownProduct` if the catalog has no record
    /// - `CurrencyMismatch` if the product uses another currency
    /// - `Price` if the resulting total cannot be represented
    #[instrument(skip(self))]
    pub fn add_item(&mut self, product_ref: &ProductRef, quantity: i64) -> Result<()> {
        let quantity = Quantity::try_from_i64(quantity)?;
        let unit_price = self.current_price(product_ref)?;

        let mut next = self.items.clone();
        match next.iter_mut().find(|item| &item.product_ref == product_ref) {
            Some(line) => {
                line.quantity = line.quantity.checked_add(quantity)?;
                line.unit_price = unit_price;
                tracing::debug!(quantity = %line.quantity, "Merged into existing line");
            }
            None => next.push(LineItem {
                product_ref: product_ref.clone(),
                quantity,
                unit_price,
            }),
        }

        self.commit(next)?;
        error::add_breadcrumb(
            "Added item",
            &[("product_ref", product_ref.as_str()), ("quantity", quantity.to_string().as_str())],
        );
        Ok(())
    }

    /// Remove the line for a product. Does nothing if there is none.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, product_ref: &ProductRef) {
        self.remove_line(product_ref);
        self.persist();
    }

    /// Replace a line's quantity.
    ///
    /// A quantity of zero or less removes the line, exactly like
    /// [`remove_item`](Self::remove_item). Updating a product that is not in
    /// the cart is a no-op reported as [`QuantityChange::Missing`]. The unit
    /// price is re-read from the catalog when the product is still listed.
    ///
    /// # Errors
    ///
    /// - `InvalidQuantity` if `quantity` exceeds the maximum line quantity
    /// - `Price` if the resulting total cannot be represented
    #[instrument(skip(self))]
    pub fn update_quantity(
        &mut self,
        product_ref: &ProductRef,
        quantity: i64,
    ) -> Result<QuantityChange> {
        if quantity <= 0 {
            let removed = self.remove_line(product_ref);
            self.persist();
            return Ok(if removed {
                QuantityChange::Removed
            } else {
                QuantityChange::Missing
            });
        }

        let quantity = Quantity::try_from_i64(quantity)?;
        let refreshed = self
            .catalog
            .product(product_ref)
            .map(|p| p.price)
            .filter(|price| price.currency_code == self.settings.currency);

        let mut next = self.items.clone();
        let Some(line) = next.iter_mut().find(|item| &item.product_ref == product_ref) else {
            tracing::debug!("No line to update");
            self.persist();
            return Ok(QuantityChange::Missing);
        };
        line.quantity = quantity;
        if let Some(price) = refreshed {
            line.unit_price = price;
        }

        self.commit(next)?;
        Ok(QuantityChange::Updated)
    }

    /// Empty the cart.
    ///
    /// Checkout calls this once, after the payment provider confirms.
    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.persist();
        error::add_breadcrumb("Cleared cart", &[]);
    }

    /// Current items and derived totals.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        // Mutations and hydration reject states whose total overflows.
        let total = total_of(&self.items, self.settings.currency).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Cart total not representable");
            Price::zero(self.settings.currency)
        });
        let item_count = self
            .items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum();

        CartSnapshot {
            items: self.items.clone(),
            total,
            item_count,
        }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Absorbed persistence problems, oldest first.
    ///
    /// Holds at most [`MAX_DIAGNOSTICS`] entries.
    #[must_use]
    pub fn diagnostics(&self) -> &[CartError] {
        &self.diagnostics
    }

    /// Store settings.
    #[must_use]
    pub const fn settings(&self) -> &CartSettings {
        &self.settings
    }

    /// The catalog the store prices against.
    #[must_use]
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    fn current_price(&self, product_ref: &ProductRef) -> Result<Price> {
        let product = self
            .catalog
            .product(product_ref)
            .ok_or_else(|| CartError::UnknownProduct(product_ref.clone()))?;

        if product.price.currency_code != self.settings.currency {
            return Err(CartError::CurrencyMismatch {
                product: product_ref.clone(),
                expected: self.settings.currency,
                found: product.price.currency_code,
            });
        }
        Ok(product.price)
    }

    fn remove_line(&mut self, product_ref: &ProductRef) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.product_ref != product_ref);
        let removed = self.items.len() != before;
        if removed {
            error::add_breadcrumb("Removed item", &[("product_ref", product_ref.as_str())]);
        }
        removed
    }

    /// Swap in a new collection if its total is representable, then persist.
    fn commit(&mut self, next: Vec<LineItem>) -> Result<()> {
        total_of(&next, self.settings.currency)?;
        self.items = next;
        self.persist();
        Ok(())
    }

    fn record(&mut self, diagnostic: CartError) {
        if self.diagnostics.len() >= MAX_DIAGNOSTICS {
            let excess = self.diagnostics.len() + 1 - MAX_DIAGNOSTICS;
            self.diagnostics.drain(..excess);
        }
        self.diagnostics.push(diagnostic);
    }

    /// Write the collection to storage. Failures are recorded, never returned.
    fn persist(&mut self) {
        let result = serde_json::to_string(&self.items)
            .map_err(|e| StorageError::Unavailable(format!("cannot serialize cart: {e}")))
            .and_then(|json| self.storage.set_item(&self.settings.storage_key, &json));

        if let Err(e) = result {
            let err = CartError::PersistenceWriteFailed(e);
            error::report(&err);
            self.record(err);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use sanekey_core::{Category, QuantityError};

    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::catalog::fixtures::{catalog, product};
    use crate::storage::MemoryStorage;

    /// Storage whose writes always fail.
    #[derive(Debug, Default)]
    struct BrokenDisk;

    impl Storage for BrokenDisk {
        fn get_item(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                message: "disk on fire".to_string(),
            })
        }

        fn set_item(&self, key: &str, _value: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                message: "disk on fire".to_string(),
            })
        }

        fn remove_item(&self, _key: &str) -> std::result::Result<(), StorageError> {
            Ok(())
        }
    }

    fn p(id: &str) -> ProductRef {
        ProductRef::new(id)
    }

    fn inr(amount: i64) -> Price {
        Price::new(Decimal::new(amount, 0), CurrencyCode::INR)
    }

    fn ready(storage: &MemoryStorage) -> CartStore<&MemoryStorage, InMemoryCatalog> {
        CartStore::create(storage, catalog(), CartSettings::default()).hydrate()
    }

    fn pairs(snapshot: &CartSnapshot) -> Vec<(&str, u32)> {
        snapshot
            .items
            .iter()
            .map(|i| (i.product_ref.as_str(), i.quantity.get()))
            .collect()
    }

    #[test]
    fn test_lifecycle_states() {
        let storage = MemoryStorage::new();
        let pending = CartStore::create(&storage, catalog(), CartSettings::default());
        assert_eq!(pending.state(), CartState::Uninitialized);
        assert_eq!(pending.hydrate().state(), CartState::Ready);
    }

    #[test]
    fn test_add_merges_and_keeps_first_add_order() {
        let storage = MemoryStorage::new();
        let mut cart = ready(&storage);

        cart.add_item(&p("P1"), 2).unwrap();
        cart.add_item(&p("P2"), 1).unwrap();
        cart.add_item(&p("P1"), 3).unwrap();

        let snapshot = cart.snapshot();
        assert_eq!(pairs(&snapshot), vec![("P1", 5), ("P2", 1)]);
        assert_eq!(snapshot.item_count, 6);
        assert_eq!(snapshot.total, inr(1000 * 5 + 250));
    }

    #[test]
    fn test_update_to_zero_removes_line() {
        let storage = MemoryStorage::new();
        let mut cart = ready(&storage);
        cart.add_item(&p("P1"), 5).unwrap();
        cart.add_item(&p("P2"), 1).unwrap();

        assert_eq!(
            cart.update_quantity(&p("P2"), 0).unwrap(),
            QuantityChange::Removed
        );

        let snapshot = cart.snapshot();
        assert_eq!(pairs(&snapshot), vec![("P1", 5)]);
        assert_eq!(snapshot.item_count, 5);
    }

    #[test]
    fn test_update_to_zero_matches_remove() {
        let left_storage = MemoryStorage::new();
        let right_storage = MemoryStorage::new();
        let mut left = ready(&left_storage);
        let mut right = ready(&right_storage);
        for cart in [&mut left, &mut right] {
            cart.add_item(&p("P1"), 1).unwrap();
            cart.add_item(&p("P2"), 2).unwrap();
            cart.add_item(&p("P3"), 3).unwrap();
        }

        left.update_quantity(&p("P2"), -3).unwrap();
        right.remove_item(&p("P2"));

        assert_eq!(left.snapshot(), right.snapshot());
        assert_eq!(
            left_storage.get_item(DEFAULT_STORAGE_KEY).unwrap(),
            right_storage.get_item(DEFAULT_STORAGE_KEY).unwrap()
        );
    }

    #[test]
    fn test_update_replaces_quantity() {
        let storage = MemoryStorage::new();
        let mut cart = ready(&storage);
        cart.add_item(&p("P1"), 4).unwrap();

        assert_eq!(
            cart.update_quantity(&p("P1"), 2).unwrap(),
            QuantityChange::Updated
        );
        assert_eq!(pairs(&cart.snapshot()), vec![("P1", 2)]);
    }

    #[test]
    fn test_update_missing_is_noop() {
        let storage = MemoryStorage::new();
        let mut cart = ready(&storage);
        cart.add_item(&p("P1"), 1).unwrap();

        assert_eq!(
            cart.update_quantity(&p("P2"), 4).unwrap(),
            QuantityChange::Missing
        );
        assert_eq!(
            cart.update_quantity(&p("P2"), 0).unwrap(),
            QuantityChange::Missing
        );
        assert_eq!(pairs(&cart.snapshot()), vec![("P1", 1)]);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let storage = MemoryStorage::new();
        let mut cart = ready(&storage);
        cart.add_item(&p("P1"), 1).unwrap();

        assert_eq!(
            cart.add_item(&p("P1"), 0),
            Err(CartError::InvalidQuantity(QuantityError::NotPositive(0)))
        );
        assert_eq!(
            cart.add_item(&p("P2"), -2),
            Err(CartError::InvalidQuantity(QuantityError::NotPositive(-2)))
        );
        assert_eq!(pairs(&cart.snapshot()), vec![("P1", 1)]);
    }

    #[test]
    fn test_add_overflowing_quantity_is_rejected() {
        let storage = MemoryStorage::new();
        let mut cart = ready(&storage);
        cart.add_item(&p("P2"), i64::from(u32::MAX)).unwrap();

        assert_eq!(
            cart.add_item(&p("P2"), 1),
            Err(CartError::InvalidQuantity(QuantityError::Overflow))
        );
        assert_eq!(cart.snapshot().item_count, u64::from(u32::MAX));
    }

    #[test]
    fn test_add_unknown_product() {
        let storage = MemoryStorage::new();
        let mut cart = ready(&storage);
        assert_eq!(
            cart.add_item(&p("ghost"), 1),
            Err(CartError::UnknownProduct(p("ghost")))
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_currency_mismatch() {
        let storage = MemoryStorage::new();
        let mut usd = product("USD1", 10, Category::Men);
        usd.price.currency_code = CurrencyCode::USD;
        let mut cart = CartStore::create(
            &storage,
            InMemoryCatalog::new([usd]),
            CartSettings::default(),
        )
        .hydrate();

        assert!(matches!(
            cart.add_item(&p("USD1"), 1),
            Err(CartError::CurrencyMismatch {
                expected: CurrencyCode::INR,
                found: CurrencyCode::USD,
                ..
            })
        ));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let storage = MemoryStorage::new();
        let mut cart = ready(&storage);
        cart.add_item(&p("P1"), 1).unwrap();
        cart.remove_item(&p("P9"));
        assert_eq!(pairs(&cart.snapshot()), vec![("P1", 1)]);
    }

    #[test]
    fn test_clear_persists_empty_array() {
        let storage = MemoryStorage::new();
        let mut cart = ready(&storage);
        cart.add_item(&p("P1"), 2).unwrap();
        cart.add_item(&p("P3"), 1).unwrap();

        cart.clear_cart();

        let snapshot = cart.snapshot();
        assert!(snapshot.items.is_empty());
        assert!(snapshot.total.is_zero());
        assert_eq!(snapshot.item_count, 0);
        assert_eq!(
            storage.get_item(DEFAULT_STORAGE_KEY).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_every_mutation_persists() {
        let storage = MemoryStorage::new();
        let mut cart = ready(&storage);

        cart.add_item(&p("P2"), 3).unwrap();
        let stored: Vec<LineItem> =
            serde_json::from_str(&storage.get_item(DEFAULT_STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored, cart.items());

        cart.update_quantity(&p("P2"), 1).unwrap();
        let stored: Vec<LineItem> =
            serde_json::from_str(&storage.get_item(DEFAULT_STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored.first().map(|i| i.quantity.get()), Some(1));
    }

    #[test]
    fn test_rehydration_reproduces_snapshot() {
        let storage = MemoryStorage::new();
        let before = {
            let mut cart = ready(&storage);
            cart.add_item(&p("P3"), 2).unwrap();
            cart.add_item(&p("P1"), 1).unwrap();
            cart.add_item(&p("P3"), 1).unwrap();
            cart.snapshot()
        };

        let after = ready(&storage);
        assert_eq!(after.snapshot(), before);
        assert!(after.diagnostics().is_empty());
    }

    #[test]
    fn test_corrupt_storage_hydrates_empty() {
        let storage = MemoryStorage::with_item(DEFAULT_STORAGE_KEY, "{not json");
        let cart = ready(&storage);

        assert!(cart.snapshot().items.is_empty());
        assert!(matches!(
            cart.diagnostics(),
            [CartError::PersistenceReadCorrupt(_)]
        ));
    }

    #[test]
    fn test_malformed_records_hydrate_empty() {
        let cases = [
            r#"{"productRef": "P1"}"#,
            r#"[{"productRef": "P1"}]"#,
            r#"[{"productRef": "P1", "quantity": 0, "unitPrice": {"amount": "1", "currencyCode": "INR"}}]"#,
            r#"[{"productRef": "P1", "quantity": 1, "unitPrice": {"amount": "1", "currencyCode": "INR"}},
                {"productRef": "P1", "quantity": 2, "unitPrice": {"amount": "1", "currencyCode": "INR"}}]"#,
            r#"[{"productRef": "P1", "quantity": 1, "unitPrice": {"amount": "1", "currencyCode": "EUR"}}]"#,
        ];

        for raw in cases {
            let storage = MemoryStorage::with_item(DEFAULT_STORAGE_KEY, raw);
            let cart = ready(&storage);
            assert!(cart.is_empty(), "expected empty cart for {raw}");
            assert_eq!(cart.diagnostics().len(), 1, "expected diagnostic for {raw}");
        }
    }

    #[test]
    fn test_unreadable_storage_hydrates_empty() {
        let cart = CartStore::create(BrokenDisk, catalog(), CartSettings::default()).hydrate();
        assert!(cart.is_empty());
        assert!(matches!(
            cart.diagnostics(),
            [CartError::PersistenceReadCorrupt(_)]
        ));
    }

    #[test]
    fn test_write_failure_is_absorbed() {
        let mut cart = CartStore::create(BrokenDisk, catalog(), CartSettings::default()).hydrate();

        cart.add_item(&p("P1"), 2).unwrap();
        cart.remove_item(&p("P9"));

        assert_eq!(pairs(&cart.snapshot()), vec![("P1", 2)]);
        let writes = cart
            .diagnostics()
            .iter()
            .filter(|d| matches!(d, CartError::PersistenceWriteFailed(_)))
            .count();
        assert_eq!(writes, 2);
    }

    #[test]
    fn test_diagnostics_are_bounded_under_repeated_write_failures() {
        let mut cart = CartStore::create(BrokenDisk, catalog(), CartSettings::default()).hydrate();
        assert!(matches!(
            cart.diagnostics(),
            [CartError::PersistenceReadCorrupt(_)]
        ));

        for _ in 0..100 {
            cart.add_item(&p("P1"), 1).unwrap();
        }

        assert_eq!(cart.snapshot().item_count, 100);
        assert_eq!(cart.diagnostics().len(), MAX_DIAGNOSTICS);
        assert!(
            cart.diagnostics()
                .iter()
                .all(|d| matches!(d, CartError::PersistenceWriteFailed(_)))
        );
    }

    #[test]
    fn test_price_read_at_add_and_update_time() {
        let storage = MemoryStorage::new();
        let mut cart = ready(&storage);
        cart.add_item(&p("P1"), 1).unwrap();
        assert_eq!(cart.snapshot().total, inr(1000));

        // A fresh catalog with a new price only takes effect on the next update.
        let mut repriced = CartStore::create(
            &storage,
            InMemoryCatalog::new([product("P1", 800, Category::Women)]),
            CartSettings::default(),
        )
        .hydrate();
        assert_eq!(repriced.snapshot().total, inr(1000));

        repriced.update_quantity(&p("P1"), 2).unwrap();
        assert_eq!(repriced.snapshot().total, inr(1600));
    }

    #[test]
    fn test_update_keeps_price_when_product_delisted() {
        let storage = MemoryStorage::new();
        ready(&storage).add_item(&p("P2"), 1).unwrap();

        let mut cart = CartStore::create(
            &storage,
            InMemoryCatalog::default(),
            CartSettings::default(),
        )
        .hydrate();
        cart.update_quantity(&p("P2"), 3).unwrap();
        assert_eq!(cart.snapshot().total, inr(750));
    }

    #[test]
    fn test_custom_storage_key() {
        let storage = MemoryStorage::new();
        let settings = CartSettings {
            storage_key: "guest-cart".to_string(),
            ..CartSettings::default()
        };
        let mut cart = CartStore::create(&storage, catalog(), settings).hydrate();
        cart.add_item(&p("P1"), 1).unwrap();

        assert!(storage.get_item("guest-cart").unwrap().is_some());
        assert!(storage.get_item(DEFAULT_STORAGE_KEY).unwrap().is_none());
    }
}
