//! Password-reset confirmation proxy — the one rate-limited endpoint.
//!
//! Request order: validate the body (400 with field violations), admit
//! through the rate limiter (429 with retry delay), then forward upstream
//! through the authenticated client with status and body passed through.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::rate_limit;
use crate::services::validate::{PasswordResetConfirm, validate_password_reset};
use crate::state::AppState;
use crate::upstream::{UpstreamError, UpstreamResponse};

/// `POST /api/auth/password-reset/confirm`
pub async fn confirm(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(body): Json<PasswordResetConfirm>,
) -> Response {
    let violations = validate_password_reset(&body);
    if !violations.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "statusCode": 400,
                "message": "Validation failed",
                "errors": violations,
            })),
        )
            .into_response();
    }

    let key = rate_limit::derive_identifier(body.email.as_deref(), body.token.as_deref(), &addr.ip().to_string());
    if let Err(e) = state.rate_limiter.check_and_record(&key) {
        return e.into_response();
    }

    let payload = json!({
        "email": body.email,
        "token": body.token,
        "password": body.password,
    });
    match state.api.post_json("/api/auth/password-reset/confirm", payload).await {
        Ok(resp) => proxy(resp),
        Err(UpstreamError::SessionExpired) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "statusCode": 401, "message": "Session expired" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "password reset confirmation proxy failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "statusCode": 502, "message": "Upstream unreachable" })),
            )
                .into_response()
        }
    }
}

/// Pass the upstream status and body through unchanged.
fn proxy(resp: UpstreamResponse) -> Response {
    let status = StatusCode::from_u16(resp.status).unwrap_or(StatusCode::BAD_GATEWAY);
    if resp.body.is_empty() {
        status.into_response()
    } else {
        (status, [(header::CONTENT_TYPE, "application/json")], resp.body).into_response()
    }
}

#[cfg(test)]
#[path = "password_test.rs"]
mod tests;
