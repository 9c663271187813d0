//! Core types for Statewise.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod token;

pub use id::*;
pub use price::{CurrencyCode, Price};
pub use token::SessionId;
