//! # shelf-wasm
//!
//! WebAssembly bindings for the bookshelf cart.
//!
//! This crate provides a browser-side cart that:
//! - Applies the same state transitions as the server-side store
//! - Persists every mutation to `localStorage` under one key
//! - Falls back to an empty cart when the stored value is unreadable
//!
//! Mutations are synchronous here; there is no simulated latency.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmCart, format_price } from 'shelf-wasm';
//!
//! await init();
//!
//! const cart = WasmCart.load();          // key "cart"
//! cart.add(book, 1);
//! console.log(cart.count(), format_price(cart.total_cents()));
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use shelf_core::{decode_cart, Book, Cart, Money, DEFAULT_CART_KEY};
use wasm_bindgen::prelude::*;

/// Browser cart mirrored to `localStorage`
#[wasm_bindgen]
pub struct WasmCart {
    key: String,
    cart: Cart,
}

#[wasm_bindgen]
impl WasmCart {
    /// Empty cart bound to `key` (default `"cart"`), without reading storage
    #[wasm_bindgen(constructor)]
    pub fn new(key: Option<String>) -> WasmCart {
        WasmCart {
            key: key.unwrap_or_else(|| DEFAULT_CART_KEY.to_string()),
            cart: Cart::new(),
        }
    }

    /// Cart restored from `localStorage`, or empty if nothing usable is stored
    pub fn load(key: Option<String>) -> WasmCart {
        let mut cart = WasmCart::new(key);
        cart.cart = storage::load(&cart.key).unwrap_or_default();
        cart
    }

    /// Add a book (a plain object in the catalog's shape)
    pub fn add(&mut self, book: JsValue, quantity: u32) -> Result<(), JsValue> {
        let book: Book = serde_wasm_bindgen::from_value(book)
            .map_err(|e| JsValue::from_str(&format!("Invalid book: {}", e)))?;
        self.add_book(&book, quantity);
        Ok(())
    }

    /// Remove a book; no-op if absent
    pub fn remove(&mut self, book_id: &str) {
        self.cart.remove(book_id);
        self.persist();
    }

    /// Set a quantity exactly; below 1 removes the line
    pub fn update_quantity(&mut self, book_id: &str, quantity: i32) {
        self.cart.update_quantity(book_id, i64::from(quantity));
        self.persist();
    }

    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist();
    }

    /// Subtotal in cents
    pub fn total_cents(&self) -> i64 {
        self.cart.total().cents()
    }

    /// Subtotal formatted for display
    pub fn total_display(&self) -> String {
        self.cart.total().display()
    }

    /// Number of items (sum of quantities)
    pub fn count(&self) -> u32 {
        u32::try_from(self.cart.item_count()).unwrap_or(u32::MAX)
    }

    /// Cart lines as an array of plain objects
    pub fn items(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.cart)
            .map_err(|e| JsValue::from_str(&format!("Failed to encode cart: {}", e)))
    }

    #[wasm_bindgen(getter)]
    pub fn key(&self) -> String {
        self.key.clone()
    }
}

impl WasmCart {
    fn add_book(&mut self, book: &Book, quantity: u32) {
        self.cart.add(book, quantity);
        self.persist();
    }

    fn persist(&self) {
        if let Err(message) = storage::save(&self.key, &self.cart) {
            log(&format!("cart not saved: {}", message));
        }
    }
}

/// Total in cents of a stored cart value (JSON string)
#[wasm_bindgen]
pub fn stored_cart_total(raw: &str) -> Result<i64, JsValue> {
    let cart = decode_cart(raw).map_err(|e| JsValue::from_str(&format!("Invalid cart: {}", e)))?;
    Ok(cart.total().cents())
}

/// Format a price in cents to display string
#[wasm_bindgen]
pub fn format_price(cents: i64) -> String {
    Money::from_cents(cents).display()
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(target_arch = "wasm32")]
mod storage {
    use shelf_core::{decode_cart, encode_cart, Cart};

    fn local_storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    pub fn load(key: &str) -> Option<Cart> {
        let raw = local_storage()?.get_item(key).ok().flatten()?;
        match decode_cart(&raw) {
            Ok(cart) => Some(cart),
            Err(e) => {
                super::log(&format!("stored cart unreadable, starting empty: {}", e));
                None
            }
        }
    }

    pub fn save(key: &str, cart: &Cart) -> Result<(), String> {
        let storage = local_storage().ok_or_else(|| "localStorage unavailable".to_string())?;
        let raw = encode_cart(cart).map_err(|e| e.to_string())?;
        storage
            .set_item(key, &raw)
            .map_err(|_| "localStorage write rejected".to_string())
    }
}

/// Off the browser there is no durable slot; the cart lives in memory only.
#[cfg(not(target_arch = "wasm32"))]
mod storage {
    use shelf_core::Cart;

    pub fn load(_key: &str) -> Option<Cart> {
        None
    }

    pub fn save(_key: &str, _cart: &Cart) -> Result<(), String> {
        Ok(())
    }
}
