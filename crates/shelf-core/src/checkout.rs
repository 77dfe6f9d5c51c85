//! # Checkout Receipt
//!
//! Demo checkout: no payment is taken, the caller gets a receipt and the
//! cart is left as it was.

use crate::cart::Cart;
use crate::error::{ShelfError, ShelfResult};
use crate::summary::{CartSummary, ShippingPolicy};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const DEMO_CHECKOUT_MESSAGE: &str = "Thank you for your order! This is a demo checkout. \
     In a real store you would be redirected to a payment gateway.";

/// Receipt for a placeholder checkout
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReceipt {
    /// Generated order ID
    pub order_id: String,

    pub summary: CartSummary,

    pub message: String,

    pub placed_at: DateTime<Utc>,
}

impl CheckoutReceipt {
    /// Produce a receipt for a non-empty cart
    pub fn for_cart(cart: &Cart, policy: &ShippingPolicy) -> ShelfResult<Self> {
        if cart.is_empty() {
            return Err(ShelfError::InvalidRequest("Cart is empty".to_string()));
        }

        Ok(Self {
            order_id: Uuid::new_v4().to_string(),
            summary: CartSummary::from_cart(cart, policy),
            message: DEMO_CHECKOUT_MESSAGE.to_string(),
            placed_at: Utc::now(),
        })
    }
}
