//! Engine error types.
//!
//! The engine has no fatal error paths. Session misses are `Option::None`
//! (absence is an expected, frequent condition - expiry, race with the
//! sweep, client error - and the cause is deliberately indistinguishable to
//! callers). Only cart mutations can fail, and only in caller-recoverable
//! ways.

use thiserror::Error;

use statewise_core::ProductId;

/// Errors returned by cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The referenced product does not exist in the catalog.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// Quantity was zero, negative, or out of range.
    #[error("quantity must be a positive integer (got {0})")]
    InvalidQuantity(i64),
}
