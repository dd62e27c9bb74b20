//! Catalog loading and listing.
//!
//! The catalog is a YAML list of product records, e.g.:
//!
//! ```yaml
//! - id: women-1
//!   name: Floral Wrap Dress
//!   price: { amount: "1299.00", currencyCode: INR }
//!   category: women
//!   image: /images/women/floral-wrap-dress.jpg
//! ```

use std::path::Path;

use sanekey_cart::{CartConfig, InMemoryCatalog};
use sanekey_core::Product;
use tracing::info;

/// Read the catalog file into memory.
///
/// # Errors
///
/// Returns an error if the file is missing or is not a list of products.
pub async fn load(path: &Path) -> Result<InMemoryCatalog, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("Catalog not found: {}", path.display()).into());
    }

    let content = tokio::fs::read_to_string(path).await?;
    let products: Vec<Product> = serde_yaml::from_str(&content)
        .map_err(|e| format!("Invalid catalog {}: {e}", path.display()))?;

    info!(path = %path.display(), products = products.len(), "Loaded catalog");
    Ok(InMemoryCatalog::new(products))
}

/// Print every product in listing order.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
#[allow(clippy::print_stdout)]
pub async fn list(config: &CartConfig) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load(&config.catalog_path).await?;

    for product in catalog.products() {
        let stock = if product.in_stock { "" } else { "  (out of stock)" };
        println!(
            "{:<12} {:<24} {:>12}  {}{stock}",
            product.id,
            product.name,
            product.price.display(),
            product.category,
        );
    }
    Ok(())
}
