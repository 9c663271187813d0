//! The stateless-vs-stateful demonstration endpoints.
//!
//! `/api/info/stateless` increments one global counter shared by every
//! caller, whoever they are - there is no per-client memory to consult.
//! `/api/info/stateful` is the contrast: it requires a live session and
//! counts visits inside that session's own data.

use axum::{Json, extract::State};
use serde::Serialize;
use serde_json::json;
use tracing::instrument;

use statewise_core::SessionId;

use crate::error::{ApiError, Result};
use crate::middleware::CurrentSession;
use crate::state::AppState;

/// Stateless counter response.
#[derive(Debug, Serialize)]
pub struct StatelessInfo {
    /// The shared counter value after this request.
    pub request_count: u64,
    /// What the number demonstrates.
    pub note: &'static str,
}

/// Stateful visit response.
#[derive(Debug, Serialize)]
pub struct StatefulInfo {
    /// The session whose memory produced the count.
    pub session_id: SessionId,
    /// Visits made by this session to this endpoint.
    pub visits: u64,
    /// What the number demonstrates.
    pub note: &'static str,
}

/// Increment and return the global request counter.
///
/// Deliberately ignores any session context on the request: the counter is
/// keyed by nothing, so two different clients interleave into one shared
/// sequence.
#[instrument(skip(state))]
pub async fn stateless(State(state): State<AppState>) -> Json<StatelessInfo> {
    let request_count = state.engine().counter().increment_and_get();
    Json(StatelessInfo {
        request_count,
        note: "this counter is shared by every caller; the server keeps no per-client memory",
    })
}

/// Count this session's visits in its own attached data.
#[instrument(skip(state, session))]
pub async fn stateful(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<StatefulInfo>> {
    let visits = session
        .data
        .get("visits")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(0)
        + 1;

    let mut partial = std::collections::HashMap::new();
    partial.insert("visits".to_owned(), json!(visits));

    // The session can expire between the extractor's read and this update
    // only if the TTL is shorter than the request; treat it as any other miss.
    let updated = state
        .engine()
        .sessions()
        .update(&session.id, partial)
        .ok_or_else(|| ApiError::Unauthorized("session not found or expired".to_owned()))?;

    Ok(Json(StatefulInfo {
        session_id: updated.id,
        visits,
        note: "this count lives in your session; another client sees its own",
    }))
}
