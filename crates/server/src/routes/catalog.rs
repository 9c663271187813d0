//! Catalog route handlers.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::instrument;

use statewise_core::{ProductId, UserId};
use statewise_engine::{NewProduct, NewUser, Product, ProductFilter, ProductUpdate, User};

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// List products, optionally filtered by query parameters.
///
/// `min_price`, `max_price`, and `category` are the recognized filters; any
/// other query key is compared by exact equality against the same-named
/// product attribute (a product without that attribute simply fails the
/// match). All filters are ANDed.
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Product>>> {
    let filter = parse_product_filter(params)?;
    Ok(Json(state.engine().catalog().search_products(&filter)))
}

/// Get a product by ID.
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    state
        .engine()
        .catalog()
        .get_product(&id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("product {id}")))
}

/// Create a product.
#[instrument(skip(state, new))]
pub async fn create_product(
    State(state): State<AppState>,
    Json(new): Json<NewProduct>,
) -> (StatusCode, Json<Product>) {
    let product = state.engine().catalog().create_product(new);
    tracing::info!(product_id = %product.id, "product created");
    (StatusCode::CREATED, Json(product))
}

/// Update a product.
#[instrument(skip(state, update))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(update): Json<ProductUpdate>,
) -> Result<Json<Product>> {
    state
        .engine()
        .catalog()
        .update_product(&id, update)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("product {id}")))
}

/// List all users.
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.engine().catalog().list_users())
}

/// Get a user by ID.
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<User>> {
    state
        .engine()
        .catalog()
        .get_user(&id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("user {id}")))
}

/// Create a user.
#[instrument(skip(state, new))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(new): Json<NewUser>,
) -> (StatusCode, Json<User>) {
    let user = state.engine().catalog().create_user(new);
    tracing::info!(user_id = %user.id, "user created");
    (StatusCode::CREATED, Json(user))
}

/// Build a [`ProductFilter`] from raw query parameters.
fn parse_product_filter(params: HashMap<String, String>) -> Result<ProductFilter> {
    let mut filter = ProductFilter::default();

    for (key, value) in params {
        match key.as_str() {
            "min_price" => filter.min_price = Some(parse_price(&key, &value)?),
            "max_price" => filter.max_price = Some(parse_price(&key, &value)?),
            "category" => filter.category = Some(value),
            _ => {
                filter.extra.insert(key, Value::String(value));
            }
        }
    }

    Ok(filter)
}

fn parse_price(key: &str, value: &str) -> Result<Decimal> {
    value
        .parse::<Decimal>()
        .map_err(|e| ApiError::BadRequest(format!("invalid {key}: {e}")))
}
