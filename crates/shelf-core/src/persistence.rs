//! # Cart Persistence Trait
//!
//! Seam between the cart store and durable storage.
//! Implementations: in-memory (here), JSON files (`shelf-store`),
//! browser `localStorage` (`shelf-wasm`).
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │          CartPersistence (trait)              │
//! │  ├── load()   once, at startup                │
//! │  ├── save()   after every mutation, wholesale │
//! │  └── backend_name()                           │
//! └───────────────────────────────────────────────┘
//!                        ▲
//!        ┌───────────────┼────────────────┐
//!        │               │                │
//! ┌──────┴──────┐ ┌──────┴───────┐ ┌──────┴───────┐
//! │   Memory    │ │ FilePersist. │ │ localStorage │
//! └─────────────┘ └──────────────┘ └──────────────┘
//! ```
//!
//! Every backend stores the same value: the cart encoded as a JSON array
//! of cart lines, under a single key. There is no version field.

use crate::cart::Cart;
use crate::error::{ShelfError, ShelfResult};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Default key the cart is stored under
pub const DEFAULT_CART_KEY: &str = "cart";

/// Durable slot holding one cart.
#[async_trait]
pub trait CartPersistence: Send + Sync {
    /// Read the stored cart. `Ok(None)` means nothing has been stored yet.
    async fn load(&self) -> ShelfResult<Option<Cart>>;

    /// Overwrite the stored cart.
    async fn save(&self, cart: &Cart) -> ShelfResult<()>;

    /// Backend name (for logging).
    fn backend_name(&self) -> &'static str;
}

/// Type alias for a shared persistence backend (dynamic dispatch)
pub type BoxedCartPersistence = Arc<dyn CartPersistence>;

/// Encode a cart in the stored layout
pub fn encode_cart(cart: &Cart) -> ShelfResult<String> {
    Ok(serde_json::to_string(cart)?)
}

/// Decode a cart from the stored layout
pub fn decode_cart(raw: &str) -> ShelfResult<Cart> {
    Ok(serde_json::from_str(raw)?)
}

/// In-process slot. Holds the encoded form so loads go through the same
/// decoding path as real storage.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    slot: Mutex<Option<String>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw stored content, valid or not
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    /// Current raw stored content
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

#[async_trait]
impl CartPersistence for MemoryPersistence {
    async fn load(&self) -> ShelfResult<Option<Cart>> {
        let raw = self
            .slot
            .lock()
            .map_err(|e| ShelfError::Internal(format!("memory slot lock: {e}")))?
            .clone();
        raw.as_deref().map(decode_cart).transpose()
    }

    async fn save(&self, cart: &Cart) -> ShelfResult<()> {
        let encoded = encode_cart(cart)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| ShelfError::Internal(format!("memory slot lock: {e}")))?;
        *slot = Some(encoded);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
