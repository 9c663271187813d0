//! Request middleware and extractors.

pub mod session;

pub use session::{CurrentSession, SESSION_TOKEN_HEADER, SessionToken};
