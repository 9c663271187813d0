//! Session extractors.
//!
//! The session token travels in the `X-Session-Token` request header. Two
//! extractors cover the two levels of trust handlers need:
//!
//! - [`SessionToken`] only parses the header - it does not touch the store.
//! - [`CurrentSession`] resolves the token to a live session, refreshing
//!   its expiry as a side effect. This is the liveness gate: cart handlers
//!   use it so a dead session is rejected *before* the cart store (which by
//!   design does not check liveness itself) is ever reached.
//!
//! Every rejection is 401 regardless of whether the token was never
//! issued, deleted, or expired - the miss causes are indistinguishable by
//! design.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use statewise_core::SessionId;
use statewise_engine::Session;

use crate::error::ApiError;
use crate::state::AppState;

/// Request header carrying the session token.
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// Extractor for the raw session token header.
///
/// Rejects with 401 when the header is missing or not valid UTF-8. Does
/// not check the store - use this for operations (like logout) that want
/// the token without the read-refresh side effect.
pub struct SessionToken(pub SessionId);

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(SESSION_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing session token".to_owned()))?;

        Ok(Self(SessionId::new(token)))
    }
}

/// Extractor that requires a live session.
///
/// Resolves the token through the session store, which refreshes
/// `last_accessed_at` and `expires_at` atomically with the read.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     CurrentSession(session): CurrentSession,
/// ) -> impl IntoResponse {
///     format!("session {}", session.id)
/// }
/// ```
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<S> for CurrentSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let SessionToken(id) = SessionToken::from_request_parts(parts, state).await?;
        let app = AppState::from_ref(state);

        let session = app
            .engine()
            .sessions()
            .get(&id)
            .ok_or_else(|| ApiError::Unauthorized("session not found or expired".to_owned()))?;

        Ok(Self(session))
    }
}
