//! Cart route handlers.
//!
//! Every handler here goes through the [`CurrentSession`] extractor first:
//! the cart store itself does not check session liveness, so dead tokens
//! must be rejected before the store is reached. That ordering is the
//! architectural seam, not an accident.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::instrument;

use statewise_core::ProductId;
use statewise_engine::Cart;

use crate::error::Result;
use crate::middleware::CurrentSession;
use crate::state::AppState;

/// Add item request body.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    /// Catalog product to add.
    pub product_id: ProductId,
    /// Quantity to add (default 1). Must be positive.
    pub quantity: Option<i64>,
}

/// Get the session's cart, creating an empty one on first access.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Json<Cart> {
    Json(state.engine().carts().get_cart(&session.id))
}

/// Add a quantity of a product to the cart.
///
/// Adding a product already in the cart increments its line quantity.
#[instrument(skip(state, session, request))]
pub async fn add_item(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<Cart>> {
    let quantity = request.quantity.unwrap_or(1);
    let cart = state
        .engine()
        .carts()
        .add_item(&session.id, &request.product_id, quantity)?;

    tracing::debug!(
        session_id = %session.id,
        product_id = %request.product_id,
        quantity,
        "item added to cart"
    );
    Ok(Json(cart))
}

/// Remove a product's line from the cart entirely.
///
/// A no-op (still 200 with the cart) if the product was never in the cart.
#[instrument(skip(state, session))]
pub async fn remove_item(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(product_id): Path<ProductId>,
) -> Json<Cart> {
    Json(state.engine().carts().remove_item(&session.id, &product_id))
}

/// Empty the cart, preserving the cart record itself.
#[instrument(skip(state, session))]
pub async fn clear(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Json<Cart> {
    Json(state.engine().carts().clear_cart(&session.id))
}
