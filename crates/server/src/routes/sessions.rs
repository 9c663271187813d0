//! Session route handlers.

use std::collections::HashMap;

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use statewise_core::UserId;
use statewise_engine::Session;

use crate::error::{ApiError, Result};
use crate::middleware::SessionToken;
use crate::state::AppState;

/// Create session request body.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Optional user to associate with the session.
    pub user_id: Option<UserId>,
    /// Initial attached data.
    #[serde(default)]
    pub data: HashMap<String, Value>,
}

/// Update session request body.
#[derive(Debug, Deserialize)]
pub struct UpdateSessionRequest {
    /// Keys to shallow-merge into the session's data.
    pub data: HashMap<String, Value>,
}

/// Create a new session and return it, token included.
///
/// Creation always succeeds; the caller is responsible for presenting the
/// returned token on subsequent requests.
#[instrument(skip(state, request))]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> (StatusCode, Json<Session>) {
    let session = state
        .engine()
        .sessions()
        .create(request.user_id, request.data);

    tracing::info!(session_id = %session.id, "session created");
    (StatusCode::CREATED, Json(session))
}

/// Read the current session, refreshing its expiry.
#[instrument(skip(state, token))]
pub async fn current(
    State(state): State<AppState>,
    token: SessionToken,
) -> Result<Json<Session>> {
    state
        .engine()
        .sessions()
        .get(&token.0)
        .map(Json)
        .ok_or_else(|| ApiError::Unauthorized("session not found or expired".to_owned()))
}

/// Shallow-merge data into the current session.
#[instrument(skip(state, token, request))]
pub async fn update(
    State(state): State<AppState>,
    token: SessionToken,
    Json(request): Json<UpdateSessionRequest>,
) -> Result<Json<Session>> {
    state
        .engine()
        .sessions()
        .update(&token.0, request.data)
        .map(Json)
        .ok_or_else(|| ApiError::Unauthorized("session not found or expired".to_owned()))
}

/// Delete the current session (logout), cascading to its cart.
///
/// 204 when a session was removed; 401 when the token resolved to nothing,
/// whatever the cause.
#[instrument(skip(state, token))]
pub async fn delete(State(state): State<AppState>, token: SessionToken) -> Result<StatusCode> {
    if state.engine().delete_session(&token.0) {
        tracing::info!(session_id = %token.0, "session deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::Unauthorized(
            "session not found or expired".to_owned(),
        ))
    }
}
