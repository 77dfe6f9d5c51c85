//! # Store Errors

use shelf_core::ShelfError;
use thiserror::Error;

/// Errors surfaced by the cart store handle
#[derive(Debug, Error)]
pub enum StoreError {
    /// The worker task owning the cart is no longer running
    #[error("Cart store is closed")]
    Closed,

    #[error(transparent)]
    Shelf(#[from] ShelfError),
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
