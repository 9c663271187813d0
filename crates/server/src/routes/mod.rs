//! HTTP route handlers for the Statewise API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                        - Liveness check
//!
//! # Sessions
//! POST   /api/sessions                  - Create a session (returns the token)
//! GET    /api/sessions/current          - Read + refresh the current session
//! PATCH  /api/sessions/current          - Shallow-merge data into the session
//! DELETE /api/sessions/current          - Logout (cascades to the cart)
//!
//! # Cart (requires a live session token)
//! GET    /api/cart                      - Get (lazily create) the cart
//! POST   /api/cart/items                - Add a product (aggregates quantity)
//! DELETE /api/cart/items/{product_id}   - Remove a line entirely
//! DELETE /api/cart                      - Empty the cart
//!
//! # Catalog
//! GET    /api/products                  - List/search products
//! POST   /api/products                  - Create a product
//! GET    /api/products/{id}             - Product detail
//! PUT    /api/products/{id}             - Update a product
//! GET    /api/users                     - List users
//! POST   /api/users                     - Create a user
//! GET    /api/users/{id}                - User detail
//!
//! # Demonstration
//! GET    /api/info/stateless            - Increment the global counter
//! GET    /api/info/stateful             - Count visits in the session
//! ```

pub mod cart;
pub mod catalog;
pub mod info;
pub mod sessions;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the session routes router.
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/", post(sessions::create)).route(
        "/current",
        get(sessions::current)
            .patch(sessions::update)
            .delete(sessions::delete),
    )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add_item))
        .route("/items/{product_id}", delete(cart::remove_item))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route(
            "/products/{id}",
            get(catalog::get_product).put(catalog::update_product),
        )
        .route("/users", get(catalog::list_users).post(catalog::create_user))
        .route("/users/{id}", get(catalog::get_user))
}

/// Create the demonstration info routes router.
pub fn info_routes() -> Router<AppState> {
    Router::new()
        .route("/stateless", get(info::stateless))
        .route("/stateful", get(info::stateful))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/sessions", session_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api", catalog_routes())
        .nest("/api/info", info_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running; the engine has no external
/// dependencies to probe.
pub async fn health() -> &'static str {
    "ok"
}
