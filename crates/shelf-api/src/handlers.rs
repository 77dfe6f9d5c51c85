//! # Request Handlers
//!
//! Axum request handlers for the storefront API: catalog browsing and the
//! session cart.

use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shelf_core::{
    Book, Cart, CartLine, CartSummary, CatalogQuery, CheckoutReceipt, ShelfError, ShippingPolicy,
    StarRating,
};
use shelf_store::StoreError;
use tracing::{error, info, instrument};

/// Related books shown on a detail page
const RELATED_LIMIT: usize = 4;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Add-to-cart request
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    /// Book ID
    pub book_id: String,
    /// Quantity
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Wait for the add to commit before responding
    #[serde(default)]
    pub wait: bool,
}

fn default_quantity() -> u32 {
    1
}

/// Set-quantity request
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    /// New quantity; anything below 1 removes the line
    pub quantity: i64,
}

/// Category listing query
#[derive(Debug, Default, Deserialize)]
pub struct CategoriesQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Cart contents with derived totals
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartLine>,
    pub count: u64,
    pub summary: CartSummary,
    pub loading: bool,
}

impl CartResponse {
    pub fn from_cart(cart: Cart, policy: &ShippingPolicy, loading: bool) -> Self {
        let summary = CartSummary::from_cart(&cart, policy);
        Self {
            count: summary.item_count,
            items: cart.into(),
            summary,
            loading,
        }
    }
}

/// Accepted-but-not-committed add
#[derive(Debug, Serialize)]
pub struct QueuedAddResponse {
    pub status: &'static str,
    pub book_id: String,
    pub quantity: u32,
    pub loading: bool,
}

/// Book detail page data
#[derive(Debug, Serialize)]
pub struct BookDetailResponse<'a> {
    pub book: &'a Book,
    pub stars: StarRating,
    pub related: Vec<&'a Book>,
    /// Quantity of this book already in the cart
    pub in_cart: u32,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn shelf_error_to_response(err: ShelfError) -> ApiError {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn store_error_to_response(err: StoreError) -> ApiError {
    error!("Cart store error: {}", err);
    let message = err.to_string();
    match err {
        StoreError::Closed => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new(message, 503)),
        ),
        StoreError::Shelf(e) => shelf_error_to_response(e),
    }
}

fn cart_response(state: &AppState, cart: Cart) -> Json<CartResponse> {
    Json(CartResponse::from_cart(
        cart,
        state.shipping(),
        state.cart.is_loading(),
    ))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "bookshelf",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Filtered, paginated catalog
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Response {
    Json(state.catalog.search(&query)).into_response()
}

/// Single book with related titles
pub async fn get_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> Result<Response, ApiError> {
    let book = state.catalog.get_book_by_id(&book_id).ok_or_else(|| {
        shelf_error_to_response(ShelfError::BookNotFound {
            book_id: book_id.clone(),
        })
    })?;

    let in_cart = state
        .cart
        .cart()
        .get(&book.id)
        .map(|line| line.quantity)
        .unwrap_or(0);

    Ok(Json(BookDetailResponse {
        book,
        stars: book.stars(),
        related: state.catalog.related_books(book, RELATED_LIMIT),
        in_cart,
    })
    .into_response())
}

/// Featured books
pub async fn featured_books(State(state): State<AppState>) -> impl IntoResponse {
    let books = state.catalog.get_featured_books();
    Json(serde_json::json!({
        "books": books,
        "count": books.len()
    }))
}

/// Newest books
pub async fn new_arrivals(State(state): State<AppState>) -> impl IntoResponse {
    let books = state.catalog.get_new_arrivals();
    Json(serde_json::json!({
        "books": books,
        "count": books.len()
    }))
}

/// Categories with book counts
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<CategoriesQuery>,
) -> impl IntoResponse {
    let categories = state.catalog.categories(query.limit);
    Json(serde_json::json!({
        "categories": categories,
        "count": categories.len()
    }))
}

/// Current cart
pub async fn get_cart(State(state): State<AppState>) -> Json<CartResponse> {
    cart_response(&state, state.cart.cart())
}

/// Add a book to the cart
#[instrument(skip(state, request), fields(book_id = %request.book_id, quantity = request.quantity))]
pub async fn add_cart_item(
    State(state): State<AppState>,
    Json(request): Json<AddItemRequest>,
) -> Result<Response, ApiError> {
    if request.quantity == 0 {
        return Err(shelf_error_to_response(ShelfError::InvalidRequest(
            "quantity must be at least 1".to_string(),
        )));
    }

    let book = state
        .catalog
        .get_book_by_id(&request.book_id)
        .ok_or_else(|| {
            shelf_error_to_response(ShelfError::BookNotFound {
                book_id: request.book_id.clone(),
            })
        })?;

    if !book.in_stock {
        return Err(shelf_error_to_response(ShelfError::OutOfStock {
            book_id: book.id.clone(),
        }));
    }

    let pending = state.cart.add_to_cart(book.clone(), request.quantity);

    if request.wait {
        let cart = pending.await.map_err(store_error_to_response)?;
        info!("Added to cart: {} x{}", book.title, request.quantity);
        return Ok(cart_response(&state, cart).into_response());
    }

    // Commit happens on the store's own schedule
    drop(pending);
    info!("Queued add: {} x{}", book.title, request.quantity);
    Ok((
        StatusCode::ACCEPTED,
        Json(QueuedAddResponse {
            status: "queued",
            book_id: book.id.clone(),
            quantity: request.quantity,
            loading: state.cart.is_loading(),
        }),
    )
        .into_response())
}

/// Set a line's quantity
#[instrument(skip(state, request), fields(quantity = request.quantity))]
pub async fn update_cart_item(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state
        .cart
        .update_quantity(book_id, request.quantity)
        .await
        .map_err(store_error_to_response)?;
    Ok(cart_response(&state, cart))
}

/// Remove a line
#[instrument(skip(state))]
pub async fn remove_cart_item(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state
        .cart
        .remove_from_cart(book_id)
        .await
        .map_err(store_error_to_response)?;
    Ok(cart_response(&state, cart))
}

/// Empty the cart
pub async fn clear_cart(State(state): State<AppState>) -> Result<Json<CartResponse>, ApiError> {
    let cart = state
        .cart
        .clear_cart()
        .await
        .map_err(store_error_to_response)?;
    info!("Cart cleared");
    Ok(cart_response(&state, cart))
}

/// Demo checkout: returns a receipt, takes no payment
pub async fn checkout(State(state): State<AppState>) -> Result<Json<CheckoutReceipt>, ApiError> {
    let receipt = CheckoutReceipt::for_cart(&state.cart.cart(), state.shipping())
        .map_err(shelf_error_to_response)?;

    info!(
        "Demo checkout {}: {} items, total={}",
        receipt.order_id, receipt.summary.item_count, receipt.summary.total
    );
    Ok(Json(receipt))
}
