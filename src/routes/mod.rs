//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the public storefront root, the role-gated subtrees, the sign-in
//! callback contract, and the rate-limited password-reset proxy under a
//! single Axum router.

pub mod auth;
pub mod pages;
pub mod password;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(pages::home))
        .route("/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
        .route("/account", get(pages::account))
        .route("/store/dashboard", get(pages::store_dashboard))
        .route("/admin/dashboard", get(pages::admin_dashboard))
        .route("/api/auth/session", get(auth::session_view))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/password-reset/confirm", post(password::confirm))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
