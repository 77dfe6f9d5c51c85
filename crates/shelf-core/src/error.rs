//! # Shelf Error Types
//!
//! Typed error handling for the bookshelf cart store.
//! Catalog lookups, persistence and checkout return `Result<T, ShelfError>`.
//!
//! Cart mutations themselves never fail: unknown ids are no-ops and
//! invalid quantities are normalized, so nothing here is raised by them.

use thiserror::Error;

/// Core error type for catalog, persistence and checkout operations
#[derive(Debug, Error)]
pub enum ShelfError {
    /// Configuration errors (bad env values, unreadable catalog)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Book not found in catalog
    #[error("Book not found: {book_id}")]
    BookNotFound { book_id: String },

    /// Book exists but cannot be added to a cart
    #[error("Book is out of stock: {book_id}")]
    OutOfStock { book_id: String },

    /// Durable storage could not be read or written
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShelfError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ShelfError::Configuration(_) => 500,
            ShelfError::InvalidRequest(_) => 400,
            ShelfError::BookNotFound { .. } => 404,
            ShelfError::OutOfStock { .. } => 409,
            ShelfError::Persistence(_) => 503,
            ShelfError::Serialization(_) => 500,
            ShelfError::Internal(_) => 500,
        }
    }
}

impl From<serde_json::Error> for ShelfError {
    fn from(err: serde_json::Error) -> Self {
        ShelfError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ShelfError {
    fn from(err: toml::de::Error) -> Self {
        ShelfError::Configuration(format!("invalid catalog: {}", err))
    }
}

/// Result type alias for shelf operations
pub type ShelfResult<T> = Result<T, ShelfError>;
