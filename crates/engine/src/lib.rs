//! Statewise Engine - the in-memory state engine.
//!
//! Everything in this crate is process-local and memory-resident by design:
//! a restart loses all sessions, carts, and the request counter. That loss
//! is the behavior the service demonstrates, not an oversight.
//!
//! # Components
//!
//! - [`catalog`] - Seeded reference data (users, products); no expiration.
//! - [`session`] - Session records with sliding-window expiry.
//! - [`cart`] - Per-session carts with item aggregation and derived totals.
//! - [`counter`] - The global stateless request counter.
//! - [`StateEngine`] - Facade wiring the stores together; owns the
//!   cross-store behaviors (cascade delete, expiry sweep).
//!
//! # Concurrency
//!
//! Each store guards its backing map with a [`parking_lot::RwLock`]; every
//! mutating operation - including the read-then-refresh in session gets and
//! the read-then-recompute-total in cart mutations - runs entirely under the
//! write lock, so concurrent callers can never observe a half-applied
//! operation and the sweep can never interleave with an in-flight refresh.
//! No operation suspends or performs I/O.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod counter;
mod engine;
pub mod error;
pub mod session;

pub use cart::{Cart, CartItem, CartStore};
pub use catalog::{CatalogStore, NewProduct, NewUser, Product, ProductFilter, ProductUpdate, User};
pub use counter::RequestCounter;
pub use engine::StateEngine;
pub use error::CartError;
pub use session::{DEFAULT_SESSION_TTL_SECS, Session, SessionStore};
