//! # shelf-api
//!
//! HTTP API layer for the bookshelf storefront.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for browsing the catalog
//! - REST endpoints for the session cart and a demo checkout
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/books` | Search and paginate books |
//! | GET | `/api/v1/books/{id}` | Get book |
//! | GET | `/api/v1/featured` | Featured books |
//! | GET | `/api/v1/new-arrivals` | New arrivals |
//! | GET | `/api/v1/categories` | Categories |
//! | GET | `/api/v1/cart` | Cart contents |
//! | POST | `/api/v1/cart/items` | Add to cart |
//! | POST | `/api/v1/cart/checkout` | Demo checkout |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
