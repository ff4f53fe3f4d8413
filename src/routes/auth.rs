//! Auth routes — sign-in callback contract, login page, session view, logout.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Redirect, Response};
use serde::Deserialize;

use crate::roles::LOGIN_ROUTE;
use crate::state::AppState;

/// Marker appended to the login route when the callback carried no token.
const ERR_NO_TOKEN: &str = "no_token";
/// Marker appended when the token could not be exchanged for a profile.
const ERR_AUTH_FAILED: &str = "authentication_failed";

#[derive(Deserialize)]
pub struct CallbackQuery {
    token: Option<String>,
}

/// `GET /auth/callback` — the sign-in redirect lands here with a bearer
/// token in the query string. Populates the session, then forwards to the
/// signed-in role's home route. Failures bounce back to the login page with
/// a machine-readable error marker, never silently.
pub async fn callback(State(state): State<AppState>, Query(params): Query<CallbackQuery>) -> Response {
    let Some(token) = params.token.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
        return Redirect::temporary(&format!("{LOGIN_ROUTE}?error={ERR_NO_TOKEN}")).into_response();
    };

    match state.session.set_token(token).await {
        Ok(user) => Redirect::temporary(user.role.home_route()).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "sign-in token exchange failed");
            Redirect::temporary(&format!("{LOGIN_ROUTE}?error={ERR_AUTH_FAILED}")).into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct LoginQuery {
    error: Option<String>,
}

/// `GET /login` — sign-in page, echoing the callback's error marker.
pub async fn login(Query(params): Query<LoginQuery>) -> Html<String> {
    let banner = match params.error.as_deref() {
        Some(ERR_NO_TOKEN) => "<p class=\"error\">The sign-in link was missing its token.</p>",
        Some(ERR_AUTH_FAILED) => "<p class=\"error\">Sign-in failed. Please try again.</p>",
        _ => "",
    };
    Html(format!(
        "<!doctype html><title>Sign in</title><h1>Sign in</h1>{banner}<p>Use your storefront sign-in link to continue.</p>"
    ))
}

/// `GET /api/auth/session` — current session snapshot.
pub async fn session_view(State(state): State<AppState>) -> Json<serde_json::Value> {
    let snapshot = state.session.snapshot().await;
    let user = state.session.current_user().await;
    Json(serde_json::json!({
        "hydrated": snapshot.hydrated,
        "authenticated": snapshot.authenticated,
        "user": user,
    }))
}

/// `POST /api/auth/logout` — clear the session and its persisted record.
pub async fn logout(State(state): State<AppState>) -> StatusCode {
    state.session.logout().await;
    StatusCode::NO_CONTENT
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
