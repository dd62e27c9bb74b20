//! Sanekey cart library.
//!
//! Owns the shopping cart for one browsing session and the narrow interfaces
//! it uses to talk to its collaborators:
//!
//! - [`store`] - The cart store and its `create -> hydrate -> ready` lifecycle
//! - [`storage`] - Local-storage style slots (memory and file backed)
//! - [`catalog`] - Product catalog lookups
//! - [`summary`] - Order totals (subtotal, shipping, tax)
//! - [`view`] - Display-ready cart data
//! - [`session`] - Current-user contract
//! - [`checkout`] - Payment orchestration that clears the cart on success
//! - [`config`] - Environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod session;
pub mod storage;
pub mod store;
pub mod summary;
pub mod view;

pub use catalog::{InMemoryCatalog, ProductCatalog};
pub use checkout::{Checkout, PaymentGateway, SimulatedGateway};
pub use config::CartConfig;
pub use error::{CartError, CheckoutError, Result};
pub use session::{CurrentUser, StaticSession, UserSession};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{CartSettings, CartSnapshot, CartState, CartStore, LineItem, PendingCart, QuantityChange};
pub use summary::OrderSummary;
pub use view::CartView;
