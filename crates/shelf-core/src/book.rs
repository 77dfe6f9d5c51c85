//! # Book Types
//!
//! Catalog records for the bookshelf store.
//! Books are loaded from a TOML catalog and never mutated afterwards.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A book in the catalog
///
/// Field names serialize in camelCase (`inStock`) because the same shape is
/// embedded in every persisted cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique book identifier
    pub id: String,

    pub title: String,

    pub author: String,

    /// Category name (matches `Category::name`)
    pub category: String,

    /// Unit price
    pub price: Money,

    /// Cover image URL
    #[serde(default)]
    pub cover: String,

    /// Average rating, 0 to 5
    #[serde(default)]
    pub rating: f64,

    /// Whether the book can currently be added to a cart
    #[serde(default = "default_true")]
    pub in_stock: bool,

    #[serde(default)]
    pub pages: u32,

    /// Publication year
    #[serde(default)]
    pub year: i32,

    #[serde(default)]
    pub description: String,
}

fn default_true() -> bool {
    true
}

impl Book {
    /// Create an in-stock book with the required fields
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            category: String::new(),
            price,
            cover: String::new(),
            rating: 0.0,
            in_stock: true,
            pages: 0,
            year: 0,
            description: String::new(),
        }
    }

    /// Builder: set category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder: set rating (clamped to 0..=5)
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating.clamp(0.0, 5.0);
        self
    }

    /// Builder: set publication year
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Builder: set cover URL
    pub fn with_cover(mut self, url: impl Into<String>) -> Self {
        self.cover = url.into();
        self
    }

    /// Builder: mark as out of stock
    pub fn out_of_stock(mut self) -> Self {
        self.in_stock = false;
        self
    }

    /// Star breakdown for display
    pub fn stars(&self) -> StarRating {
        StarRating::from_rating(self.rating)
    }

    /// Case-insensitive match against title or author
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query) || self.author.to_lowercase().contains(&query)
    }
}

/// Five-star breakdown of a rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StarRating {
    pub full: u8,
    pub half: u8,
    pub empty: u8,
}

impl StarRating {
    pub const MAX_STARS: u8 = 5;

    /// Full stars for the integer part, one half star for any fractional part
    pub fn from_rating(rating: f64) -> Self {
        let rating = rating.clamp(0.0, f64::from(Self::MAX_STARS));
        let full = rating.floor() as u8;
        let half = u8::from(rating.fract() > 0.0 && full < Self::MAX_STARS);
        Self {
            full,
            half,
            empty: Self::MAX_STARS - full - half,
        }
    }
}

/// A catalog category as configured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Icon name used by the storefront
    #[serde(default)]
    pub icon: String,
}

/// A category with the number of books filed under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub count: usize,
}
