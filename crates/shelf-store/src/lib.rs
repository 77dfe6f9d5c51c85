//! # shelf-store
//!
//! Session cart store for the bookshelf storefront.
//!
//! This crate provides:
//!
//! 1. **CartStore** - cloneable handle over a single worker task
//!    - Queued mutations (add, remove, update quantity, clear)
//!    - Simulated add latency with a loading flag
//!    - Snapshot reads for totals and counts
//!
//! 2. **FilePersistence** - JSON file backend for `CartPersistence`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shelf_store::{CartStore, StoreConfig};
//!
//! let config = StoreConfig::from_env()?;
//! let store = CartStore::open_file(&config).await?;
//!
//! // Returns immediately; await to observe the commit
//! let pending = store.add_to_cart(book.clone(), 1);
//! assert!(store.is_loading());
//! pending.await?;
//!
//! println!("{} items, {}", store.cart_count(), store.cart_total());
//! ```

pub mod config;
pub mod error;
pub mod file;
pub mod store;

// Re-exports
pub use config::{CommitOrder, StoreConfig, DEFAULT_ADD_DELAY};
pub use error::{StoreError, StoreResult};
pub use file::FilePersistence;
pub use store::{CartStore, PendingAdd};
