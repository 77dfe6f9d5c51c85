//! # Bookshelf
//!
//! Storefront API serving a static book catalog and a persisted session cart.
//!
//! ## Usage
//!
//! ```bash
//! # Optional overrides
//! export PORT=8080
//! export CART_DATA_DIR=./data
//! export CART_ADD_DELAY_MS=300
//! export CART_COMMIT_ORDER=fifo
//!
//! # Run the server
//! bookshelf
//! ```

use shelf_api::{routes, state::AppState};
use shelf_store::CartStore;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let state = AppState::new().await?;
    let addr = state.config.socket_addr()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %state.config.environment,
        books = state.catalog.len(),
        "Bookshelf starting"
    );
    info!(
        backend = state.cart.backend_name(),
        commit_order = %state.cart.commit_order(),
        items = state.cart.cart_count(),
        total = %state.cart.cart_total(),
        "Cart restored"
    );
    info!(
        free_over = %state.shipping().free_threshold,
        flat_rate = %state.shipping().flat_rate,
        "Shipping policy"
    );

    // Kept for the shutdown summary; the router owns its own clone
    let cart = state.cart.clone();
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log_final_cart(&cart);
    Ok(())
}

fn log_final_cart(cart: &CartStore) {
    if cart.is_loading() {
        warn!("Shutting down with adds still pending; they may be lost");
    }
    info!(
        items = cart.cart_count(),
        total = %cart.cart_total(),
        "Shutdown complete"
    );
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Ctrl+C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
