//! Per-session shopping carts with item aggregation and derived totals.
//!
//! One cart per session id, created lazily on first access. Line items
//! snapshot the product's name and price at add time, so later catalog
//! mutations never reach into existing carts.
//!
//! Boundary responsibility, preserved deliberately: this store never checks
//! whether a session id still refers to a live session. Liveness
//! enforcement belongs to the calling layer (the HTTP handlers reject dead
//! tokens before reaching this store). Duplicating expiry logic here would
//! mean two places to get it wrong; the cost is that a cart can linger for
//! an expired id until the engine's cascade delete runs.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use statewise_core::{CurrencyCode, Price, ProductId, SessionId};

use crate::catalog::CatalogStore;
use crate::error::CartError;

/// A single cart line.
///
/// `name` and `price` are snapshots taken when the product was first added.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// The catalog product this line refers to.
    pub product_id: ProductId,
    /// Product name at add time.
    pub name: String,
    /// Unit price at add time.
    pub price: Price,
    /// Aggregated quantity (adds to an existing line increment this).
    pub quantity: u32,
    /// When the line was first added.
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Line total: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// A per-session cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// The session this cart belongs to.
    pub session_id: SessionId,
    /// Ordered line items, at most one per distinct product.
    pub items: Vec<CartItem>,
    /// Derived sum of line totals. Never independently settable.
    pub total: Price,
    /// When the cart was first created (preserved across clears).
    pub created_at: DateTime<Utc>,
    /// When the cart was last mutated.
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    fn empty(session_id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            items: Vec::new(),
            total: Price::zero(CurrencyCode::default()),
            created_at: now,
            updated_at: now,
        }
    }

    /// Recompute `total` from the current items.
    ///
    /// Called after every mutation, under the same write lock, so callers
    /// can never observe items and total out of sync.
    fn recompute_total(&mut self) {
        let amount = self
            .items
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc + item.line_total().amount);
        let currency = self
            .items
            .first()
            .map_or_else(CurrencyCode::default, |item| item.price.currency_code);
        self.total = Price::new(amount, currency);
    }
}

/// In-memory cart store.
///
/// Keyed by session id; depends on the [`CatalogStore`] only to resolve
/// products on add. Constructed explicitly and passed via dependency
/// injection, like the other stores.
#[derive(Debug)]
pub struct CartStore {
    catalog: Arc<CatalogStore>,
    carts: RwLock<HashMap<SessionId, Cart>>,
}

impl CartStore {
    /// Create a cart store backed by the given catalog.
    #[must_use]
    pub fn new(catalog: Arc<CatalogStore>) -> Self {
        Self {
            catalog,
            carts: RwLock::new(HashMap::new()),
        }
    }

    /// Number of carts currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.carts.read().len()
    }

    /// Whether the store holds no carts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.carts.read().is_empty()
    }

    /// Get the cart for a session, creating an empty one if none exists.
    ///
    /// There is no not-found case: lazy creation is the miss behavior.
    pub fn get_cart(&self, session_id: &SessionId) -> Cart {
        let now = Utc::now();
        let mut carts = self.carts.write();
        carts
            .entry(session_id.clone())
            .or_insert_with(|| Cart::empty(session_id.clone(), now))
            .clone()
    }

    /// Add a quantity of a product to the session's cart.
    ///
    /// If the product is already in the cart its quantity is incremented,
    /// not replaced; otherwise a new line is appended with a snapshot of the
    /// product's current name and price. The total is recomputed before the
    /// cart is returned.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`] if `quantity` is zero, negative, or
    ///   exceeds `u32::MAX`.
    /// - [`CartError::ProductNotFound`] if the product is not in the catalog.
    pub fn add_item(
        &self,
        session_id: &SessionId,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<Cart, CartError> {
        let quantity =
            u32::try_from(quantity).map_err(|_| CartError::InvalidQuantity(quantity))?;
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }

        let product = self
            .catalog
            .get_product(product_id)
            .ok_or_else(|| CartError::ProductNotFound(product_id.clone()))?;

        let now = Utc::now();
        let mut carts = self.carts.write();
        let cart = carts
            .entry(session_id.clone())
            .or_insert_with(|| Cart::empty(session_id.clone(), now));

        match cart.items.iter_mut().find(|item| item.product_id == *product_id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(quantity);
            }
            None => {
                cart.items.push(CartItem {
                    product_id: product_id.clone(),
                    name: product.name,
                    price: product.price,
                    quantity,
                    added_at: now,
                });
            }
        }

        cart.recompute_total();
        cart.updated_at = now;
        Ok(cart.clone())
    }

    /// Remove a product's line from the session's cart entirely.
    ///
    /// Whole-line removal regardless of quantity, not a decrement. A no-op
    /// (not an error) if the product was never in the cart. The total is
    /// recomputed before the cart is returned.
    pub fn remove_item(&self, session_id: &SessionId, product_id: &ProductId) -> Cart {
        let now = Utc::now();
        let mut carts = self.carts.write();
        let cart = carts
            .entry(session_id.clone())
            .or_insert_with(|| Cart::empty(session_id.clone(), now));

        cart.items.retain(|item| item.product_id != *product_id);
        cart.recompute_total();
        cart.updated_at = now;
        cart.clone()
    }

    /// Empty the session's cart.
    ///
    /// Items are cleared and the total reset to zero, but the cart record
    /// itself is preserved: a subsequent [`CartStore::get_cart`] sees the
    /// original `created_at`, not a fresh one.
    pub fn clear_cart(&self, session_id: &SessionId) -> Cart {
        let now = Utc::now();
        let mut carts = self.carts.write();
        let cart = carts
            .entry(session_id.clone())
            .or_insert_with(|| Cart::empty(session_id.clone(), now));

        cart.items.clear();
        cart.recompute_total();
        cart.updated_at = now;
        cart.clone()
    }

    /// Delete the session's cart record outright.
    ///
    /// Returns whether something was actually removed. This is the cascade
    /// hook invoked by [`crate::StateEngine`] when a session is deleted or
    /// swept; handlers never call it directly.
    pub fn delete_cart(&self, session_id: &SessionId) -> bool {
        self.carts.write().remove(session_id).is_some()
    }
}
