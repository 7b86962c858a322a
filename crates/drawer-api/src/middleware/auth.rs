//! Shared-password authentication gate.
//!
//! The whole API sits behind one password (`DRAWER_PASSWORD`), carried
//! as a bearer token. When no password is configured the gate is open —
//! local development mode.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::AppState;

/// Require the shared password on every request passing through.
pub async fn require_password(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.password.as_deref() else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match provided {
        Some(token) if token == expected => next.run(request).await,
        _ => {
            warn!(
                subsystem = "api",
                component = "auth",
                path = %request.uri().path(),
                "rejected request with missing or wrong password"
            );
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "error": "Unauthorized" })),
            )
                .into_response()
        }
    }
}
