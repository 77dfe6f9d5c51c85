//! # Routes
//!
//! Axum router configuration for the storefront API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Catalog:
///   - GET /api/v1/books?category=&q=&page= - Filtered, paginated books
///   - GET /api/v1/books/{book_id} - Book detail with related books
///   - GET /api/v1/featured - Featured books
///   - GET /api/v1/new-arrivals - Newest books
///   - GET /api/v1/categories?limit= - Categories with counts
///
/// - Cart:
///   - GET    /api/v1/cart - Cart contents and summary
///   - DELETE /api/v1/cart - Clear cart
///   - POST   /api/v1/cart/items - Add a book
///   - PATCH  /api/v1/cart/items/{book_id} - Set quantity
///   - DELETE /api/v1/cart/items/{book_id} - Remove a book
///   - POST   /api/v1/cart/checkout - Demo checkout
pub fn create_router(state: AppState) -> Router {
    // The storefront is served from a different origin during development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let catalog_routes = Router::new()
        .route("/books", get(handlers::list_books))
        .route("/books/{book_id}", get(handlers::get_book))
        .route("/featured", get(handlers::featured_books))
        .route("/new-arrivals", get(handlers::new_arrivals))
        .route("/categories", get(handlers::list_categories));

    let cart_routes = Router::new()
        .route("/cart", get(handlers::get_cart).delete(handlers::clear_cart))
        .route("/cart/items", post(handlers::add_cart_item))
        .route(
            "/cart/items/{book_id}",
            patch(handlers::update_cart_item).delete(handlers::remove_cart_item),
        )
        .route("/cart/checkout", post(handlers::checkout));

    let api_routes = Router::new().merge(catalog_routes).merge(cart_routes);

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API v1
        .nest("/api/v1", api_routes)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        // State
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppConfig;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use shelf_core::{Book, BookCatalog, Category, MemoryPersistence, Money};
    use shelf_store::{CartStore, StoreConfig};
    use std::sync::Arc;
    use std::time::Duration;

    fn catalog() -> BookCatalog {
        BookCatalog::new()
            .with_category(Category {
                id: "fiction".into(),
                name: "Fiction".into(),
                icon: "book-open".into(),
            })
            .with_book(
                Book::new("b1", "The Quiet Harbor", "Elena Marsh", Money::from_cents(1000))
                    .with_category("Fiction")
                    .with_rating(4.6)
                    .with_year(2021),
            )
            .with_book(
                Book::new("b2", "Paper Lanterns", "Hiro Tanaka", Money::from_cents(500))
                    .with_category("Fiction")
                    .with_rating(4.2)
                    .with_year(2019),
            )
            .with_book(
                Book::new("b3", "Harbors and Empires", "Luis Moreno", Money::from_cents(2799))
                    .with_category("History")
                    .out_of_stock(),
            )
    }

    async fn test_server_with(config: StoreConfig) -> TestServer {
        let cart = CartStore::open(Arc::new(MemoryPersistence::new()), &config).await;
        let state = AppState::from_parts(AppConfig::new(), catalog(), cart);
        TestServer::new(create_router(state)).unwrap()
    }

    async fn test_server() -> TestServer {
        test_server_with(StoreConfig::new().with_add_delay(Duration::ZERO)).await
    }

    async fn add(server: &TestServer, book_id: &str, quantity: u32) -> Value {
        let response = server
            .post("/api/v1/cart/items")
            .json(&json!({ "book_id": book_id, "quantity": quantity, "wait": true }))
            .await;
        response.assert_status_ok();
        response.json::<Value>()
    }

    #[tokio::test]
    async fn test_health() {
        let server = test_server().await;
        let response = server.get("/health").await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_list_books_filters_and_paginates() {
        let server = test_server().await;

        let all = server.get("/api/v1/books").await.json::<Value>();
        assert_eq!(all["total_matches"], 3);
        assert_eq!(all["total_pages"], 1);
        assert_eq!(all["page"], 1);

        let fiction = server
            .get("/api/v1/books")
            .add_query_param("category", "Fiction")
            .add_query_param("q", "harbor")
            .await
            .json::<Value>();
        assert_eq!(fiction["total_matches"], 1);
        assert_eq!(fiction["items"][0]["id"], "b1");
    }

    #[tokio::test]
    async fn test_list_books_page_far_past_end() {
        let server = test_server().await;

        let response = server
            .get("/api/v1/books")
            .add_query_param("page", usize::MAX)
            .await;
        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["items"].as_array().map(Vec::len), Some(0));
        assert_eq!(body["total_matches"], 3);
    }

    #[tokio::test]
    async fn test_book_detail() {
        let server = test_server().await;

        let detail = server.get("/api/v1/books/b1").await.json::<Value>();
        assert_eq!(detail["book"]["title"], "The Quiet Harbor");
        assert_eq!(detail["stars"]["full"], 4);
        assert_eq!(detail["stars"]["half"], 1);
        assert_eq!(detail["related"][0]["id"], "b2");
        assert_eq!(detail["in_cart"], 0);

        server
            .get("/api/v1/books/missing")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_showcase_and_categories() {
        let server = test_server().await;

        let featured = server.get("/api/v1/featured").await.json::<Value>();
        assert_eq!(featured["count"], 1);
        assert_eq!(featured["books"][0]["id"], "b1");

        let arrivals = server.get("/api/v1/new-arrivals").await.json::<Value>();
        assert_eq!(arrivals["books"][0]["id"], "b1");

        let categories = server.get("/api/v1/categories").await.json::<Value>();
        assert_eq!(categories["categories"][0]["count"], 2);
    }

    #[tokio::test]
    async fn test_cart_flow() {
        let server = test_server().await;

        add(&server, "b1", 2).await;
        let cart = add(&server, "b2", 1).await;
        assert_eq!(cart["count"], 3);
        assert_eq!(cart["summary"]["subtotal"], 25.0);
        assert_eq!(cart["summary"]["shipping"], 5.99);
        assert_eq!(cart["items"][0]["inStock"], true);

        let cart = add(&server, "b1", 3).await;
        assert_eq!(cart["items"].as_array().map(Vec::len), Some(2));
        assert_eq!(cart["items"][0]["quantity"], 5);

        let cart = server
            .patch("/api/v1/cart/items/b1")
            .json(&json!({ "quantity": 0 }))
            .await
            .json::<Value>();
        assert_eq!(cart["count"], 1);

        let cart = server
            .delete("/api/v1/cart/items/not-there")
            .await
            .json::<Value>();
        assert_eq!(cart["count"], 1);

        let cart = server.delete("/api/v1/cart").await.json::<Value>();
        assert_eq!(cart["count"], 0);
        assert_eq!(cart["summary"]["subtotal"], 0.0);
    }

    #[tokio::test]
    async fn test_add_rejections() {
        let server = test_server().await;

        server
            .post("/api/v1/cart/items")
            .json(&json!({ "book_id": "nope" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        server
            .post("/api/v1/cart/items")
            .json(&json!({ "book_id": "b3" }))
            .await
            .assert_status(StatusCode::CONFLICT);

        server
            .post("/api/v1/cart/items")
            .json(&json!({ "book_id": "b1", "quantity": 0 }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_add_without_wait_is_accepted() {
        let config = StoreConfig::new().with_add_delay(Duration::from_secs(60));
        let server = test_server_with(config).await;

        let response = server
            .post("/api/v1/cart/items")
            .json(&json!({ "book_id": "b1" }))
            .await;
        response.assert_status(StatusCode::ACCEPTED);

        let body = response.json::<Value>();
        assert_eq!(body["status"], "queued");
        assert_eq!(body["loading"], true);

        let cart = server.get("/api/v1/cart").await.json::<Value>();
        assert_eq!(cart["loading"], true);
        assert_eq!(cart["count"], 0);
    }

    #[tokio::test]
    async fn test_checkout() {
        let server = test_server().await;

        server
            .post("/api/v1/cart/checkout")
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        add(&server, "b1", 6).await;
        let receipt = server.post("/api/v1/cart/checkout").await.json::<Value>();
        assert_eq!(receipt["summary"]["total"], 60.0);
        assert_eq!(receipt["summary"]["shipping"], 0.0);
        assert!(receipt["order_id"].as_str().is_some());

        // Demo checkout leaves the cart alone
        let cart = server.get("/api/v1/cart").await.json::<Value>();
        assert_eq!(cart["count"], 6);
    }
}
