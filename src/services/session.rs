//! Session lifecycle — the single source of truth for "who is signed in".
//!
//! DESIGN
//! ======
//! `SessionStore` is an explicit context object: a cloneable handle over
//! shared state, built once at startup and injected into everything that
//! needs it. The token and user always move together; the expiry timestamp
//! is derived from the token's claims when it is installed, never stored.
//! `hydrated` flips false→true exactly once per process, after the persisted
//! record has been read.
//!
//! TRADE-OFFS
//! ==========
//! Mutations serialize on a write lock, and each mutation persists before
//! releasing it, so the durable record never trails the in-memory state.
//! A completed `logout` can still race ahead of an in-flight `set_token`;
//! whichever takes the write lock last wins, and callers are expected to
//! tolerate that.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::roles::Role;
use crate::services::persist::{PersistError, PersistedSession, SessionStorage};
use crate::services::profile::{ProfileApi, ProfileError};
use crate::services::token::{self, TokenError};

/// The signed-in user, as exchanged for the bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Guard-facing view of the session at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub hydrated: bool,
    pub authenticated: bool,
    pub role: Option<Role>,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("bearer token already expired")]
    ExpiredToken,
    #[error("token decode failed: {0}")]
    Token(#[from] TokenError),
    #[error("profile exchange failed: {0}")]
    Profile(#[from] ProfileError),
    #[error("session storage failed: {0}")]
    Storage(#[from] PersistError),
}

#[derive(Default)]
struct SessionState {
    token: Option<String>,
    user: Option<SessionUser>,
    /// Unix seconds, derived from the token claims at install time.
    expires_at: Option<i64>,
    hydrated: bool,
}

pub(crate) fn now_ts() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

/// Cloneable session handle. See the module docs for lifecycle rules.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<SessionState>>,
    storage: Arc<dyn SessionStorage>,
    profile: Arc<dyn ProfileApi>,
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>, profile: Arc<dyn ProfileApi>) -> Self {
        Self { inner: Arc::new(RwLock::new(SessionState::default())), storage, profile }
    }

    // =========================================================================
    // HYDRATION
    // =========================================================================

    /// Restore the persisted session, once. Subsequent calls are no-ops.
    ///
    /// A record whose token is expired or undecodable is discarded and the
    /// process starts signed out; storage failures are logged, not fatal.
    pub async fn hydrate(&self) {
        self.hydrate_at(now_ts()).await;
    }

    async fn hydrate_at(&self, now: i64) {
        if self.inner.read().await.hydrated {
            return;
        }

        let persisted = match self.storage.load().await {
            Ok(persisted) => persisted,
            Err(e) => {
                tracing::warn!(error = %e, "session storage unreadable, starting signed out");
                None
            }
        };

        let mut state = self.inner.write().await;
        if state.hydrated {
            return;
        }
        state.hydrated = true;

        let Some(record) = persisted else { return };
        match token::decode_claims(&record.token) {
            Ok(claims) if claims.exp > now => {
                tracing::info!(user = %record.user.email, "session restored");
                state.token = Some(record.token);
                state.user = Some(record.user);
                state.expires_at = Some(claims.exp);
            }
            _ => {
                drop(state);
                tracing::info!("persisted session expired, starting signed out");
                if let Err(e) = self.storage.clear().await {
                    tracing::warn!(error = %e, "failed to clear stale session record");
                }
            }
        }
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Install a bearer token: decode its expiry, exchange it for the user
    /// profile, then atomically set token + user + expiry and persist.
    ///
    /// # Errors
    ///
    /// Fails without touching existing state if the token is undecodable or
    /// already expired, or if the profile exchange is rejected.
    pub async fn set_token(&self, token: &str) -> Result<SessionUser, SessionError> {
        self.set_token_at(token, now_ts()).await
    }

    pub(crate) async fn set_token_at(&self, token: &str, now: i64) -> Result<SessionUser, SessionError> {
        let claims = token::decode_claims(token)?;
        if claims.exp <= now {
            return Err(SessionError::ExpiredToken);
        }

        let user = self.profile.fetch_profile(token).await?;

        // Persist under the write lock, before mutating memory, so a storage
        // failure leaves both sides untouched.
        let mut state = self.inner.write().await;
        self.storage
            .save(&PersistedSession { token: token.to_owned(), user: user.clone() })
            .await?;
        state.token = Some(token.to_owned());
        state.user = Some(user.clone());
        state.expires_at = Some(claims.exp);
        Ok(user)
    }

    /// Clear the session and its persisted record. Never fails: a storage
    /// error still leaves the in-memory session signed out.
    pub async fn logout(&self) {
        let mut state = self.inner.write().await;
        state.token = None;
        state.user = None;
        state.expires_at = None;
        if let Err(e) = self.storage.clear().await {
            tracing::warn!(error = %e, "failed to clear persisted session");
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// True iff a token is present and not expired.
    pub async fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(now_ts()).await
    }

    async fn is_authenticated_at(&self, now: i64) -> bool {
        let state = self.inner.read().await;
        state.token.is_some() && state.expires_at.is_some_and(|exp| now < exp)
    }

    /// True while the stored expiry is in the future. Returns false once
    /// expired but leaves the token in place; clearing is the caller's call.
    pub async fn check_session_expiry(&self) -> bool {
        self.check_session_expiry_at(now_ts()).await
    }

    async fn check_session_expiry_at(&self, now: i64) -> bool {
        self.inner.read().await.expires_at.is_some_and(|exp| now < exp)
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_at(now_ts()).await
    }

    async fn snapshot_at(&self, now: i64) -> SessionSnapshot {
        let state = self.inner.read().await;
        SessionSnapshot {
            hydrated: state.hydrated,
            authenticated: state.token.is_some() && state.expires_at.is_some_and(|exp| now < exp),
            role: state.user.as_ref().map(|u| u.role),
        }
    }

    pub async fn current_user(&self) -> Option<SessionUser> {
        self.inner.read().await.user.clone()
    }

    pub async fn bearer_token(&self) -> Option<String> {
        self.inner.read().await.token.clone()
    }

    /// Rewind the stored expiry into the past, leaving the token in place.
    #[cfg(test)]
    pub(crate) async fn force_expired(&self) {
        self.inner.write().await.expires_at = Some(now_ts() - 60);
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
