//! # Cart Types
//!
//! The cart and its lines. All state transitions live here as plain
//! methods; `shelf-store` decides when they run and persists the result.
//!
//! ## Invariants
//! - At most one line per book id
//! - Every line has `quantity >= 1`
//! - Lines keep the order in which their book was first added

use crate::book::Book;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// One book in the cart plus its quantity
///
/// Serializes as the book's fields with `quantity` alongside them, which is
/// the shape kept in durable storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub book: Book,

    pub quantity: u32,
}

impl CartLine {
    pub fn new(book: Book, quantity: u32) -> Self {
        Self { book, quantity }
    }

    pub fn id(&self) -> &str {
        &self.book.id
    }

    /// Unit price times quantity
    pub fn total(&self) -> Money {
        self.book.price * self.quantity
    }
}

/// Ordered set of cart lines
///
/// Deserializing always goes through [`Cart::from_lines`], so a stored
/// array with duplicates or zero quantities comes back normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from raw lines, dropping zero quantities and merging
    /// repeated ids into the first occurrence
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Cart::new();
        for line in lines {
            cart.add(&line.book, line.quantity);
        }
        cart
    }

    /// Add `quantity` copies of a book, merging into an existing line.
    /// A zero quantity leaves the cart untouched.
    pub fn add(&mut self, book: &Book, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.lines.iter_mut().find(|line| line.book.id == book.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine::new(book.clone(), quantity)),
        }
    }

    /// Remove the line for `book_id`, returning it if it was present
    pub fn remove(&mut self, book_id: &str) -> Option<CartLine> {
        let index = self.lines.iter().position(|line| line.book.id == book_id)?;
        Some(self.lines.remove(index))
    }

    /// Set a line's quantity exactly. Anything below 1 removes the line.
    /// Unknown ids are ignored.
    pub fn update_quantity(&mut self, book_id: &str, quantity: i64) {
        if quantity < 1 {
            self.remove(book_id);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.lines.iter_mut().find(|line| line.book.id == book_id) {
            line.quantity = quantity;
        }
    }

    /// Empty the cart
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of price times quantity over all lines
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::total).sum()
    }

    /// Sum of quantities over all lines
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn get(&self, book_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.book.id == book_id)
    }

    pub fn contains(&self, book_id: &str) -> bool {
        self.get(book_id).is_some()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Cart::from_lines(lines)
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str, price: f64) -> Book {
        Book::new(id, format!("Title {}", id), "Author", Money::from_decimal(price))
    }

    #[test]
    fn test_total_and_count() {
        let mut cart = Cart::new();
        cart.add(&book("b1", 10.0), 2);
        cart.add(&book("b2", 5.0), 1);

        assert_eq!(cart.total(), Money::from_cents(2500));
        assert_eq!(cart.total().display(), "$25.00");
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_distinct_adds_sum_quantities() {
        let mut cart = Cart::new();
        let quantities = [3u32, 1, 4, 1, 5];
        for (i, q) in quantities.iter().enumerate() {
            cart.add(&book(&format!("b{}", i), 1.0), *q);
        }

        assert_eq!(cart.len(), quantities.len());
        assert_eq!(cart.item_count(), 14);
    }

    #[test]
    fn test_same_book_merges() {
        let mut cart = Cart::new();
        cart.add(&book("b1", 10.0), 2);
        cart.add(&book("b2", 1.0), 1);
        cart.add(&book("b1", 10.0), 3);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get("b1").map(|l| l.quantity), Some(5));
        // First-added position is kept
        assert_eq!(cart.lines()[0].id(), "b1");
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = Cart::new();
        cart.add(&book("b1", 10.0), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_sets_exactly() {
        let mut cart = Cart::new();
        cart.add(&book("b1", 10.0), 2);
        cart.update_quantity("b1", 7);
        assert_eq!(cart.get("b1").map(|l| l.quantity), Some(7));
    }

    #[test]
    fn test_update_quantity_below_one_removes() {
        let mut cart = Cart::new();
        cart.add(&book("b1", 10.0), 2);
        cart.add(&book("b2", 5.0), 4);
        let before = cart.item_count();

        cart.update_quantity("b2", 0);
        assert!(!cart.contains("b2"));
        assert_eq!(cart.item_count(), before - 4);

        cart.update_quantity("b1", -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut cart = Cart::new();
        cart.add(&book("b1", 10.0), 2);
        let before = cart.clone();

        assert!(cart.remove("missing").is_none());
        cart.update_quantity("missing", 9);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(&book("b1", 10.0), 2);
        cart.clear();

        assert_eq!(cart.total(), Money::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_persisted_layout() {
        let mut cart = Cart::new();
        cart.add(&book("b1", 10.0), 2);

        let json = serde_json::to_value(&cart).unwrap();
        let line = &json.as_array().unwrap()[0];
        for key in [
            "id", "title", "author", "category", "price", "cover", "rating", "inStock", "pages",
            "year", "description", "quantity",
        ] {
            assert!(line.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(line["quantity"], 2);
    }

    #[test]
    fn test_round_trip_keeps_order() {
        let mut cart = Cart::new();
        cart.add(&book("b3", 1.0), 1);
        cart.add(&book("b1", 2.0), 5);
        cart.add(&book("b2", 3.0), 2);

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_deserialize_normalizes() {
        let json = r#"[
            {"id":"b1","title":"A","author":"X","category":"C","price":1.5,"quantity":1},
            {"id":"b2","title":"B","author":"Y","category":"C","price":2.0,"quantity":0},
            {"id":"b1","title":"A","author":"X","category":"C","price":1.5,"quantity":2}
        ]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("b1").map(|l| l.quantity), Some(3));
    }

    #[test]
    fn test_stored_extreme_price_total_saturates() {
        let json = r#"[{"id":"b1","title":"A","author":"X","category":"C","price":1e17,"quantity":2}]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();

        assert_eq!(cart.total(), Money::from_cents(i64::MAX));
        assert_eq!(cart.item_count(), 2);
    }
}
