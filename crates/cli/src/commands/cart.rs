//! Cart commands.
//!
//! Each invocation opens the file-backed cart, hydrates it, applies one
//! operation and exits. The store persists after every mutation, so nothing
//! needs saving here.

use sanekey_cart::{
    CartConfig, CartError, CartStore, CartView, FileStorage, InMemoryCatalog, OrderSummary,
    QuantityChange,
};
use sanekey_core::ProductRef;
use serde_json::json;
use tracing::{info, warn};

use super::catalog;

/// A ready cart backed by the configured data directory.
pub type LocalCart = CartStore<FileStorage, InMemoryCatalog>;

/// Open and hydrate the local cart.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the data directory
/// cannot be created.
pub async fn open(config: &CartConfig) -> Result<LocalCart, Box<dyn std::error::Error>> {
    let catalog = catalog::load(&config.catalog_path).await?;
    let storage = FileStorage::open(&config.data_dir)?;

    let cart = CartStore::create(storage, catalog, config.cart_settings()).hydrate();
    for diagnostic in cart.diagnostics() {
        warn!(%diagnostic, "Cart restored with problems");
    }
    Ok(cart)
}

/// Warn about persistence failures absorbed during this command.
pub fn warn_unsaved(cart: &LocalCart) {
    let failed = cart
        .diagnostics()
        .iter()
        .any(|d| matches!(d, CartError::PersistenceWriteFailed(_)));
    if failed {
        warn!("Cart changes could not be saved and will be lost when this command exits");
    }
}

/// Print the cart view, or the raw snapshot and summary as JSON.
///
/// # Errors
///
/// Returns an error if the cart cannot be opened or totals overflow.
#[allow(clippy::print_stdout)]
pub async fn show(config: &CartConfig, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let cart = open(config).await?;
    let snapshot = cart.snapshot();
    let summary = OrderSummary::from_snapshot(&snapshot, config.tax_rate)?;

    if as_json {
        let body = json!({ "snapshot": snapshot, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if snapshot.is_empty() {
        let view = CartView::empty(config.currency);
        println!("Your cart is empty (total {})", view.total);
        return Ok(());
    }

    let view = CartView::build(&snapshot, &summary, cart.catalog());

    println!("Shopping Cart ({} items)", view.item_count);
    for item in &view.items {
        let was = item
            .original_price
            .as_deref()
            .map(|p| format!(" (was {p})"))
            .unwrap_or_default();
        println!(
            "  {:<12} {:<24} {:>4} x {:>10}{was}  = {:>10}",
            item.product_ref, item.title, item.quantity, item.price, item.line_price
        );
    }
    println!("  Subtotal  {:>12}", view.subtotal);
    println!("  Shipping  {:>12}", view.shipping);
    println!("  Tax       {:>12}", view.tax);
    println!("  Total     {:>12}", view.total);
    Ok(())
}

/// Add units of a product.
///
/// # Errors
///
/// Returns an error for invalid quantities or unknown products.
pub async fn add(
    config: &CartConfig,
    product: &str,
    quantity: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut cart = open(config).await?;
    cart.add_item(&ProductRef::new(product), quantity)?;
    warn_unsaved(&cart);

    info!(product, quantity, items = cart.snapshot().item_count, "Added to cart");
    Ok(())
}

/// Remove a product's line.
///
/// # Errors
///
/// Returns an error if the cart cannot be opened.
pub async fn remove(config: &CartConfig, product: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut cart = open(config).await?;
    cart.remove_item(&ProductRef::new(product));
    warn_unsaved(&cart);

    info!(product, "Removed from cart");
    Ok(())
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns an error if the quantity is out of range.
pub async fn update(
    config: &CartConfig,
    product: &str,
    quantity: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut cart = open(config).await?;
    let change = cart.update_quantity(&ProductRef::new(product), quantity)?;
    warn_unsaved(&cart);

    match change {
        QuantityChange::Updated => info!(product, quantity, "Quantity updated"),
        QuantityChange::Removed => info!(product, "Removed from cart"),
        QuantityChange::Missing => warn!(product, "Product is not in the cart, nothing changed"),
    }
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be opened.
pub async fn clear(config: &CartConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut cart = open(config).await?;
    cart.clear_cart();
    warn_unsaved(&cart);

    info!("Cart cleared");
    Ok(())
}
