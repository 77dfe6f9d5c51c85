//! # Cart Summary
//!
//! Order summary shown next to the cart: subtotal, shipping and total.

use crate::cart::Cart;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Flat-rate shipping that becomes free above a subtotal threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    /// Subtotals strictly above this ship free
    pub free_threshold: Money,
    /// Charged otherwise
    pub flat_rate: Money,
}

impl ShippingPolicy {
    pub fn new(free_threshold: Money, flat_rate: Money) -> Self {
        Self {
            free_threshold,
            flat_rate,
        }
    }

    /// Shipping cost for a given subtotal
    pub fn shipping_for(&self, subtotal: Money) -> Money {
        if subtotal > self.free_threshold {
            Money::ZERO
        } else {
            self.flat_rate
        }
    }
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self::new(Money::from_cents(5000), Money::from_cents(599))
    }
}

/// Derived totals for a cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub subtotal: Money,
    pub shipping: Money,
    pub total: Money,
    pub item_count: u64,
    /// How much more to spend for free shipping, while under the threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_shipping_remaining: Option<Money>,
}

impl CartSummary {
    pub fn from_cart(cart: &Cart, policy: &ShippingPolicy) -> Self {
        let subtotal = cart.total();
        let shipping = policy.shipping_for(subtotal);
        let free_shipping_remaining = (subtotal < policy.free_threshold)
            .then(|| policy.free_threshold.saturating_sub(subtotal));

        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
            item_count: cart.item_count(),
            free_shipping_remaining,
        }
    }

    pub fn is_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::Book;

    fn cart_with(price_cents: i64, quantity: u32) -> Cart {
        let mut cart = Cart::new();
        cart.add(
            &Book::new("b1", "T", "A", Money::from_cents(price_cents)),
            quantity,
        );
        cart
    }

    #[test]
    fn test_flat_rate_under_threshold() {
        let summary = CartSummary::from_cart(&cart_with(1000, 2), &ShippingPolicy::default());

        assert_eq!(summary.subtotal.cents(), 2000);
        assert_eq!(summary.shipping.cents(), 599);
        assert_eq!(summary.total.cents(), 2599);
        assert_eq!(summary.free_shipping_remaining, Some(Money::from_cents(3000)));
        assert!(!summary.is_free_shipping());
    }

    #[test]
    fn test_free_shipping_above_threshold() {
        let summary = CartSummary::from_cart(&cart_with(2600, 2), &ShippingPolicy::default());

        assert!(summary.is_free_shipping());
        assert_eq!(summary.total.cents(), 5200);
        assert_eq!(summary.free_shipping_remaining, None);
    }

    #[test]
    fn test_exactly_at_threshold_still_pays() {
        let summary = CartSummary::from_cart(&cart_with(2500, 2), &ShippingPolicy::default());

        assert_eq!(summary.shipping.cents(), 599);
        assert_eq!(summary.free_shipping_remaining, None);
    }
}
