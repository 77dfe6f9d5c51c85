//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the book catalog, the session cart store and configuration.

use shelf_core::{BookCatalog, Money, ShippingPolicy};
use shelf_store::{CartStore, StoreConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Explicit catalog file; searched for when unset
    pub catalog_path: Option<PathBuf>,
    /// Shipping rules for cart summaries
    pub shipping: ShippingPolicy,
}

impl AppConfig {
    /// Built-in defaults, ignoring the environment
    pub fn new() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            catalog_path: None,
            shipping: ShippingPolicy::default(),
        }
    }

    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::new();

        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            catalog_path: std::env::var("CATALOG_PATH").ok().map(PathBuf::from),
            shipping: ShippingPolicy::new(
                money_var("FREE_SHIPPING_THRESHOLD").unwrap_or(defaults.shipping.free_threshold),
                money_var("FLAT_SHIPPING_RATE").unwrap_or(defaults.shipping.flat_rate),
            ),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port).parse().map_err(|e| {
            anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e)
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn money_var(key: &str) -> Option<Money> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(Money::from_decimal)
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Book catalog
    pub catalog: Arc<BookCatalog>,
    /// Session cart
    pub cart: CartStore,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create state from the environment: catalog file, file-backed cart
    pub async fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let store_config = StoreConfig::from_env()?;

        let catalog = load_book_catalog(config.catalog_path.as_deref())?;
        let cart = CartStore::open_file(&store_config)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to open cart store: {}", e))?;

        tracing::info!(
            "Cart storage: {} ({})",
            store_config.data_dir.join(format!("{}.json", store_config.storage_key)).display(),
            cart.backend_name()
        );

        Ok(Self::from_parts(config, catalog, cart))
    }

    /// Assemble state from already-built parts
    pub fn from_parts(config: AppConfig, catalog: BookCatalog, cart: CartStore) -> Self {
        Self {
            catalog: Arc::new(catalog),
            cart,
            config,
        }
    }

    /// Shipping policy in effect
    pub fn shipping(&self) -> &ShippingPolicy {
        &self.config.shipping
    }
}

/// Load the book catalog from config file, falling back to the built-in one
fn load_book_catalog(explicit: Option<&Path>) -> anyhow::Result<BookCatalog> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let catalog = BookCatalog::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded {} books from {}", catalog.len(), path.display());
        return Ok(catalog);
    }

    let config_paths = [
        "config/books.toml",
        "../config/books.toml",
        "../../config/books.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog = BookCatalog::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {} books from {}", catalog.len(), path);
            return Ok(catalog);
        }
    }

    tracing::info!("No catalog override found, using built-in catalog");
    Ok(BookCatalog::builtin()?)
}
