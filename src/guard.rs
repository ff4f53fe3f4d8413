//! Route guard — render-or-redirect decisions for gated route subtrees.
//!
//! DESIGN
//! ======
//! A pure state machine over `(hydrated, authenticated, role)`; the HTTP
//! layer feeds it a fresh session snapshot on every navigation, so a session
//! invalidated mid-visit redirects on the next request rather than lingering.
//! Before hydration the only legal outcome is `Loading` — redirecting off a
//! not-yet-restored session would bounce returning users to the login page.

use axum::http::{HeaderName, StatusCode};
use axum::response::{Html, IntoResponse, Response};

use crate::roles::{LOGIN_ROUTE, Role};
use crate::services::session::SessionSnapshot;

/// Decision for one navigation into a gated subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Session not yet restored: show a loading indicator, never redirect.
    Loading,
    /// Session allowed: render the subtree.
    Render,
    /// Session missing or role not allowed: send the caller here instead.
    Redirect(String),
}

/// Evaluate the guard for a subtree reachable by `allowed` roles.
///
/// A disallowed role is sent to its own home route unless the caller
/// supplies an explicit `redirect_override`.
#[must_use]
pub fn evaluate(allowed: &[Role], snapshot: &SessionSnapshot, redirect_override: Option<&str>) -> GuardOutcome {
    if !snapshot.hydrated {
        return GuardOutcome::Loading;
    }

    let role = if snapshot.authenticated { snapshot.role } else { None };
    let Some(role) = role else {
        return GuardOutcome::Redirect(LOGIN_ROUTE.to_owned());
    };

    if allowed.contains(&role) {
        GuardOutcome::Render
    } else {
        let target = redirect_override.map_or_else(|| role.home_route().to_owned(), str::to_owned);
        GuardOutcome::Redirect(target)
    }
}

/// The pre-hydration holding page: 200 with a refresh hint, not a redirect.
#[must_use]
pub fn loading_page() -> Response {
    (
        StatusCode::OK,
        [(HeaderName::from_static("refresh"), "1")],
        Html("<!doctype html><title>Loading</title><p>Restoring your session…</p>"),
    )
        .into_response()
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
