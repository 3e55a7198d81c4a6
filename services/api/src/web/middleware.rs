//! services/api/src/web/middleware.rs
//!
//! Session middleware: every toolkit route runs against exactly one session store.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use mh_toolkit_core::ports::PortError;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::web::state::{AppState, CurrentSession};

pub const SESSION_COOKIE: &str = "toolkit_session";

/// Middleware that resolves the session cookie to a live session.
///
/// Requests without a cookie, or whose session has expired, get a fresh empty
/// session and a `Set-Cookie` header on the response. The session id is
/// inserted into request extensions for handlers to use.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let now = state.clock.now();

    // 1. Resume the session named by the cookie, if it is still alive
    let resumed = match session_id_from_headers(req.headers()) {
        Some(session_id) => match state.sessions.touch_session(session_id, now).await {
            Ok(session) => Some(session),
            Err(PortError::NotFound(_)) => None,
            Err(e) => {
                error!("Failed to resume session: {:?}", e);
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
        },
        None => None,
    };

    // 2. Otherwise start a new one
    let (session, created) = match resumed {
        Some(session) => (session, false),
        None => {
            let session = state.sessions.create_session(now).await.map_err(|e| {
                error!("Failed to create session: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;
            info!("Started session {}", session.id);
            (session, true)
        }
    };

    // 3. Insert the session into request extensions and continue to the handler
    req.extensions_mut().insert(CurrentSession(session.id));
    let mut response = next.run(req).await;

    if created {
        let cookie = HeaderValue::from_str(&session_cookie(session.id)).map_err(|e| {
            error!("Failed to build session cookie: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }

    Ok(response)
}

/// Extracts the session id from the `Cookie` header, if present and well formed.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|c| c.trim().strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        .and_then(|id| Uuid::parse_str(id).ok())
}

/// A browser-session cookie: it is dropped when the browser closes.
pub fn session_cookie(session_id: Uuid) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/",
        SESSION_COOKIE, session_id
    )
}

pub fn cleared_session_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}
