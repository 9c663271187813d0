//! Opaque session token type.
//!
//! Session identifiers are bearer tokens: 128 bits of CSPRNG output,
//! rendered as unpadded URL-safe base64. They carry no structure and no
//! embedded claims - possession of the token is the whole credential, so
//! the only requirements are uniqueness and unguessability.

use core::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// An opaque session identifier.
///
/// Compared and hashed by its text form. Use [`SessionId::generate`] to
/// mint a fresh token; [`SessionId::new`] only wraps an existing token
/// string (e.g., one extracted from a request header) and performs no
/// validation - an unknown token is simply a store miss.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Number of random bytes backing a generated token.
    const TOKEN_BYTES: usize = 16;

    /// Generate a fresh random session token.
    ///
    /// 128 bits from the thread-local CSPRNG; collision probability is
    /// negligible at any realistic session count.
    #[must_use]
    pub fn generate() -> Self {
        let bytes: [u8; Self::TOKEN_BYTES] = rand::random();
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Wrap an existing token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the token's text form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

impl From<String> for SessionId {
    fn from(token: String) -> Self {
        Self(token)
    }
}
