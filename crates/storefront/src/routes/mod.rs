//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Shop page (search, product grid, cart panel)
//! GET  /health                 - Health check
//!
//! # Catalog (HTMX fragments)
//! GET  /products/grid          - Product grid fragment (search + refresh)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart panel fragment
//! POST /cart/add               - Add to cart (returns cart panel)
//! POST /cart/quantity          - Set line quantity (returns cart panel)
//! POST /cart/checkout          - Submit the cart (returns cart panel,
//!                                triggers catalog-updated on success)
//!
//! # Admin
//! GET  /admin                  - Admin page (create + update forms)
//! POST /admin/products         - Create product (returns create form)
//! POST /admin/products/update  - Update availability (returns update form)
//! ```

pub mod admin;
pub mod cart;
pub mod shop;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/quantity", post(cart::quantity))
        .route("/checkout", post(cart::checkout))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::show))
        .route("/products", post(admin::create_product))
        .route("/products/update", post(admin::update_availability))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Shop page
        .route("/", get(shop::index))
        // Catalog fragment
        .route("/products/grid", get(shop::grid))
        // Cart routes
        .nest("/cart", cart_routes())
        // Admin routes
        .nest("/admin", admin_routes())
}
