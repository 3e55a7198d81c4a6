//! services/api/src/web/session.rs
//!
//! Session lifecycle endpoints: inspect the current session or discard it.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::port_rejection;
use crate::web::middleware::cleared_session_cookie;
use crate::web::state::{AppState, CurrentSession};

//=========================================================================================
// Response Types
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct SessionInfoResponse {
    pub session_id: Uuid,
    pub created_at: String,
    pub last_accessed_at: String,
    pub thought_records: usize,
    pub activities: usize,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /session - Describe the current session
#[utoipa::path(
    get,
    path = "/session",
    responses(
        (status = 200, description = "The current session", body = SessionInfoResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_session_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentSession(session_id)): Extension<CurrentSession>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = state
        .sessions
        .touch_session(session_id, state.clock.now())
        .await
        .map_err(|e| port_rejection("Failed to read session", e))?;
    let store = state
        .sessions
        .load_store(session_id)
        .await
        .map_err(|e| port_rejection("Failed to load session", e))?;

    Ok(Json(SessionInfoResponse {
        session_id: session.id,
        created_at: session.created_at.to_rfc3339(),
        last_accessed_at: session.last_accessed_at.to_rfc3339(),
        thought_records: store.thought_records().len(),
        activities: store.activities().len(),
    }))
}

/// POST /session/reset - Discard the session and everything in it
#[utoipa::path(
    post,
    path = "/session/reset",
    responses(
        (status = 200, description = "Session discarded"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn reset_session_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentSession(session_id)): Extension<CurrentSession>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Drop the store
    state
        .sessions
        .delete_session(session_id)
        .await
        .map_err(|e| port_rejection("Failed to reset session", e))?;
    info!("Session {} reset by user", session_id);

    // 2. Clear cookie
    Ok((StatusCode::OK, [(header::SET_COOKIE, cleared_session_cookie())]))
}
