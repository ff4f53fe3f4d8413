//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! carries the session store, the authenticated upstream client, and the
//! reset-endpoint rate limiter — all cloneable handles over shared state,
//! wired once in `main`. There is no ambient global: everything that needs
//! the session receives it from here.

use crate::rate_limit::RateLimiter;
use crate::services::session::SessionStore;
use crate::upstream::ApiClient;

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub session: SessionStore,
    pub api: ApiClient,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    #[must_use]
    pub fn new(session: SessionStore, api: ApiClient, rate_limiter: RateLimiter) -> Self {
        Self { session, api, rate_limiter }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
