//! Role-gated route subtrees. Each navigation evaluates the guard against a
//! fresh session snapshot, so stale sessions redirect on their next request.

use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::guard::{self, GuardOutcome};
use crate::roles::Role;
use crate::state::AppState;

const ACCOUNT_ROLES: &[Role] = &[Role::User];
const STORE_ROLES: &[Role] = &[Role::Store];
const ADMIN_ROLES: &[Role] = &[Role::Admin];

/// `GET /` — public storefront root, ungated.
pub async fn home(State(state): State<AppState>) -> Html<String> {
    let greeting = state
        .session
        .current_user()
        .await
        .map_or_else(|| "Welcome".to_owned(), |u| format!("Welcome back, {}", u.name));
    Html(format!("<!doctype html><title>Storefront</title><h1>{greeting}</h1>"))
}

/// `GET /account` — customer subtree.
pub async fn account(State(state): State<AppState>) -> Response {
    gated(&state, ACCOUNT_ROLES, "Your account").await
}

/// `GET /store/dashboard` — store-owner subtree.
pub async fn store_dashboard(State(state): State<AppState>) -> Response {
    gated(&state, STORE_ROLES, "Store dashboard").await
}

/// `GET /admin/dashboard` — superadmin subtree.
pub async fn admin_dashboard(State(state): State<AppState>) -> Response {
    gated(&state, ADMIN_ROLES, "Admin dashboard").await
}

async fn gated(state: &AppState, allowed: &[Role], title: &str) -> Response {
    let snapshot = state.session.snapshot().await;
    match guard::evaluate(allowed, &snapshot, None) {
        GuardOutcome::Loading => guard::loading_page(),
        GuardOutcome::Redirect(to) => Redirect::temporary(&to).into_response(),
        GuardOutcome::Render => {
            let name = state
                .session
                .current_user()
                .await
                .map_or_else(|| "operator".to_owned(), |u| u.name);
            Html(format!(
                "<!doctype html><title>{title}</title><h1>{title}</h1><p>Signed in as {name}.</p>"
            ))
            .into_response()
        }
    }
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
