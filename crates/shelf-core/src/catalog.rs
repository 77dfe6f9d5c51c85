//! # Book Catalog
//!
//! Static, read-only catalog with the queries the storefront needs:
//! lookup by id, category listings, featured and new arrivals, and a
//! filtered, paginated search.

use crate::book::{Book, Category, CategorySummary};
use crate::error::ShelfResult;
use serde::{Deserialize, Serialize};

/// Books shown per catalog page
pub const ITEMS_PER_PAGE: usize = 12;

/// Maximum books returned by the featured and new-arrival listings
pub const SHOWCASE_LIMIT: usize = 4;

/// Minimum rating for a book to be featured
pub const FEATURED_MIN_RATING: f64 = 4.5;

/// Catalog bundled with the crate
const BUILTIN_CATALOG: &str = include_str!("../config/books.toml");

/// Book catalog (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookCatalog {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub books: Vec<Book>,
}

/// Search parameters for [`BookCatalog::search`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogQuery {
    /// Exact category name; empty means all categories
    #[serde(default)]
    pub category: Option<String>,
    /// Substring of title or author, case-insensitive
    #[serde(default, rename = "q")]
    pub query: Option<String>,
    /// 1-based page number
    #[serde(default)]
    pub page: Option<usize>,
}

impl CatalogQuery {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }
}

/// One page of search results
#[derive(Debug, Clone, Serialize)]
pub struct CatalogPage<'a> {
    pub items: Vec<&'a Book>,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

impl BookCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
            books: Vec::new(),
        }
    }

    /// The catalog shipped with this crate in `config/books.toml`
    pub fn builtin() -> ShelfResult<Self> {
        Self::from_toml(BUILTIN_CATALOG)
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> ShelfResult<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Builder: add a book
    pub fn with_book(mut self, book: Book) -> Self {
        self.books.push(book);
        self
    }

    /// Builder: add a category
    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    /// Find a book by ID
    pub fn get_book_by_id(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// All books filed under a category name
    pub fn get_books_by_category(&self, category: &str) -> Vec<&Book> {
        self.books.iter().filter(|b| b.category == category).collect()
    }

    /// Highest rated in-stock books
    pub fn get_featured_books(&self) -> Vec<&Book> {
        let mut featured: Vec<&Book> = self
            .books
            .iter()
            .filter(|b| b.in_stock && b.rating >= FEATURED_MIN_RATING)
            .collect();
        featured.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        featured.truncate(SHOWCASE_LIMIT);
        featured
    }

    /// Most recently published books
    pub fn get_new_arrivals(&self) -> Vec<&Book> {
        let mut arrivals: Vec<&Book> = self.books.iter().collect();
        arrivals.sort_by(|a, b| b.year.cmp(&a.year));
        arrivals.truncate(SHOWCASE_LIMIT);
        arrivals
    }

    /// Configured categories with their book counts
    pub fn categories(&self, limit: Option<usize>) -> Vec<CategorySummary> {
        self.categories
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|c| CategorySummary {
                id: c.id.clone(),
                name: c.name.clone(),
                icon: c.icon.clone(),
                count: self.books.iter().filter(|b| b.category == c.name).count(),
            })
            .collect()
    }

    /// Other books in the same category
    pub fn related_books(&self, book: &Book, limit: usize) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|b| b.category == book.category && b.id != book.id)
            .take(limit)
            .collect()
    }

    /// Filter by category and title/author, then paginate
    pub fn search(&self, query: &CatalogQuery) -> CatalogPage<'_> {
        let category = query.category.as_deref().filter(|c| !c.is_empty());
        let text = query.query.as_deref().filter(|q| !q.is_empty());

        let matches: Vec<&Book> = self
            .books
            .iter()
            .filter(|b| category.map_or(true, |c| b.category == c))
            .filter(|b| text.map_or(true, |q| b.matches_query(q)))
            .collect();

        let total_matches = matches.len();
        let total_pages = total_matches.div_ceil(ITEMS_PER_PAGE);
        let page = query.page.unwrap_or(1).max(1);
        let items = matches
            .into_iter()
            .skip((page - 1).saturating_mul(ITEMS_PER_PAGE))
            .take(ITEMS_PER_PAGE)
            .collect();

        CatalogPage {
            items,
            page,
            per_page: ITEMS_PER_PAGE,
            total_pages,
            total_matches,
        }
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
