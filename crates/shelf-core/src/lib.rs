//! # shelf-core
//!
//! Core types and traits for the bookshelf cart store.
//!
//! This crate provides:
//! - `Book`, `Money` and `BookCatalog` for the static catalog
//! - `Cart` and `CartLine` with all cart state transitions
//! - `CartSummary` and `ShippingPolicy` for derived totals
//! - `CartPersistence` trait for durable cart storage
//! - `ShelfError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use shelf_core::{BookCatalog, Cart, CartSummary, ShippingPolicy};
//!
//! let catalog = BookCatalog::builtin()?;
//! let book = catalog.get_book_by_id("4").unwrap();
//!
//! let mut cart = Cart::new();
//! cart.add(book, 2);
//!
//! let summary = CartSummary::from_cart(&cart, &ShippingPolicy::default());
//! println!("{} items, total {}", summary.item_count, summary.total);
//! ```

pub mod book;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod money;
pub mod persistence;
pub mod summary;

// Re-exports for convenience
pub use book::{Book, Category, CategorySummary, StarRating};
pub use cart::{Cart, CartLine};
pub use catalog::{BookCatalog, CatalogPage, CatalogQuery, ITEMS_PER_PAGE, SHOWCASE_LIMIT};
pub use checkout::CheckoutReceipt;
pub use error::{ShelfError, ShelfResult};
pub use money::Money;
pub use persistence::{
    decode_cart, encode_cart, BoxedCartPersistence, CartPersistence, MemoryPersistence,
    DEFAULT_CART_KEY,
};
pub use summary::{CartSummary, ShippingPolicy};
