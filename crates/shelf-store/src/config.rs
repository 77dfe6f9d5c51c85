//! # Store Configuration
//!
//! Configuration for the cart store, loaded from environment variables
//! (and a `.env` file when present).
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `CART_DATA_DIR` | `data` | Directory holding stored carts |
//! | `CART_STORAGE_KEY` | `cart` | Key the cart is stored under |
//! | `CART_ADD_DELAY_MS` | `300` | Simulated latency of `add_to_cart` |
//! | `CART_COMMIT_ORDER` | `fifo` | `fifo` or `deferred` |

use shelf_core::{ShelfError, DEFAULT_CART_KEY};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default simulated latency for adds
pub const DEFAULT_ADD_DELAY: Duration = Duration::from_millis(300);

/// How delayed adds are ordered against other mutations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommitOrder {
    /// Every mutation, including the add delay, runs through one queue.
    /// Mutations commit in submission order.
    #[default]
    Fifo,
    /// Each add waits on its own timer before joining the queue, so later
    /// mutations may overtake it (last write wins).
    Deferred,
}

impl CommitOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitOrder::Fifo => "fifo",
            CommitOrder::Deferred => "deferred",
        }
    }
}

impl FromStr for CommitOrder {
    type Err = ShelfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" => Ok(CommitOrder::Fifo),
            "deferred" => Ok(CommitOrder::Deferred),
            other => Err(ShelfError::Configuration(format!(
                "CART_COMMIT_ORDER must be 'fifo' or 'deferred', got '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for CommitOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cart store configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory for file persistence
    pub data_dir: PathBuf,

    /// Key the cart is stored under
    pub storage_key: String,

    /// Simulated latency applied to every add
    pub add_delay: Duration,

    /// Ordering of delayed adds
    pub commit_order: CommitOrder,
}

impl StoreConfig {
    /// Defaults: `data/cart.json`, 300 ms add delay, FIFO commits
    pub fn new() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            storage_key: DEFAULT_CART_KEY.to_string(),
            add_delay: DEFAULT_ADD_DELAY,
            commit_order: CommitOrder::Fifo,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ShelfError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ShelfError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(dir) = lookup("CART_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(key) = lookup("CART_STORAGE_KEY") {
            config.storage_key = key;
        }

        if let Some(delay) = lookup("CART_ADD_DELAY_MS") {
            let millis: u64 = delay.trim().parse().map_err(|_| {
                ShelfError::Configuration(format!(
                    "CART_ADD_DELAY_MS must be a whole number of milliseconds, got '{}'",
                    delay
                ))
            })?;
            config.add_delay = Duration::from_millis(millis);
        }

        if let Some(order) = lookup("CART_COMMIT_ORDER") {
            config.commit_order = order.parse()?;
        }

        Ok(config)
    }

    /// Builder: set data directory
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Builder: set storage key
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Builder: set add delay
    pub fn with_add_delay(mut self, delay: Duration) -> Self {
        self.add_delay = delay;
        self
    }

    /// Builder: set commit order
    pub fn with_commit_order(mut self, order: CommitOrder) -> Self {
        self.commit_order = order;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, StoreConfig::new());
        assert_eq!(config.add_delay, Duration::from_millis(300));
        assert_eq!(config.storage_key, "cart");
    }

    #[test]
    fn test_overrides() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("CART_DATA_DIR", "/tmp/carts"),
            ("CART_STORAGE_KEY", "guest"),
            ("CART_ADD_DELAY_MS", "0"),
            ("CART_COMMIT_ORDER", "Deferred"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/carts"));
        assert_eq!(config.storage_key, "guest");
        assert_eq!(config.add_delay, Duration::ZERO);
        assert_eq!(config.commit_order, CommitOrder::Deferred);
    }

    #[test]
    fn test_invalid_values() {
        assert!(StoreConfig::from_lookup(lookup(&[("CART_ADD_DELAY_MS", "soon")])).is_err());
        assert!(StoreConfig::from_lookup(lookup(&[("CART_COMMIT_ORDER", "lifo")])).is_err());
    }

    #[test]
    fn test_commit_order_display() {
        assert_eq!(CommitOrder::Fifo.to_string(), "fifo");
        assert_eq!("deferred".parse::<CommitOrder>().unwrap(), CommitOrder::Deferred);
    }
}
