//! Product catalog collaborator.
//!
//! The cart reads a product's `price` when an item is added or its quantity
//! changes. Everything else about the product is resolved here at display time.

use sanekey_core::{Category, Product, ProductRef};

/// Source of product records.
pub trait ProductCatalog {
    /// Look up a product by reference.
    fn product(&self, id: &ProductRef) -> Option<Product>;
}

impl<C: ProductCatalog + ?Sized> ProductCatalog for &C {
    fn product(&self, id: &ProductRef) -> Option<Product> {
        (**self).product(id)
    }
}

/// Catalog held in memory, in listing order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    /// Build a catalog from product records.
    ///
    /// Later records with an already-seen ID replace the earlier one in place.
    #[must_use]
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        let mut catalog = Self::default();
        for product in products {
            catalog.upsert(product);
        }
        catalog
    }

    /// Insert a product, replacing any record with the same ID.
    pub fn upsert(&mut self, product: Product) {
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => self.products.push(product),
        }
    }

    /// All products in listing order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products listed under `category`.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(move |p| p.category == category)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn product(&self, id: &ProductRef) -> Option<Product> {
        self.products.iter().find(|p| &p.id == id).cloned()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use rust_decimal::Decimal;
    use sanekey_core::{Category, CurrencyCode, Price, Product, ProductRef};

    use super::InMemoryCatalog;

    pub fn product(id: &str, rupees: i64, category: Category) -> Product {
        Product {
            id: ProductRef::new(id),
            name: format!("Product {id}"),
            price: Price::new(Decimal::new(rupees, 0), CurrencyCode::INR),
            original_price: None,
            category,
            image: format!("/img/{id}.jpg"),
            description: None,
            in_stock: true,
        }
    }

    /// P1 = 1000, P2 = 250, P3 = 99.50
    pub fn catalog() -> InMemoryCatalog {
        let mut p3 = product("P3", 0, Category::Sale);
        p3.price = Price::new(Decimal::new(9950, 2), CurrencyCode::INR);
        InMemoryCatalog::new([
            product("P1", 1000, Category::Women),
            product("P2", 250, Category::Accessories),
            p3,
        ])
    }
}
