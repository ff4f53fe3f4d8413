//! In-memory rate limiting for the password-reset confirmation endpoint.
//!
//! DESIGN
//! ======
//! Fixed window, one request per window per identifier, backed by
//! `HashMap<String, Instant>` where the value is the window start. A second
//! request inside the window is rejected with the whole seconds left until
//! it reopens; a request after the window replaces the entry and starts a
//! new one.
//!
//! Identifiers are derived with a fixed precedence — request body email,
//! else body token, else caller address — and hashed before keying the map,
//! so the map never holds raw addresses.
//!
//! TRADE-OFFS
//! ==========
//! Entries self-delete via a fire-and-forget timer stamped with the window
//! start, so a stale timer never removes a renewed window. State is
//! memory-resident: a process restart forgets open windows, which is
//! acceptable for this guard.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use sha2::{Digest, Sha256};

const DEFAULT_WINDOW_MS: u64 = 30_000;

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitError {
    #[error("too many requests, retry in {retry_after_secs}s")]
    TooManyRequests { retry_after_secs: u64 },
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let Self::TooManyRequests { retry_after_secs } = self;
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
                "statusCode": 429,
                "message": "Too many requests",
                "retryAfter": retry_after_secs,
            })),
        )
            .into_response()
    }
}

// =============================================================================
// IDENTIFIER DERIVATION
// =============================================================================

/// Derive the rate-limit key for a request: body email, else body token,
/// else caller address, hashed.
#[must_use]
pub fn derive_identifier(email: Option<&str>, token: Option<&str>, addr: &str) -> String {
    if let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) {
        return hash_identifier("email", &email.to_ascii_lowercase());
    }
    if let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) {
        return hash_identifier("token", token);
    }
    hash_identifier("addr", addr)
}

fn hash_identifier(kind: &str, value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    hasher.update(b":");
    hasher.update(value.as_bytes());
    let bytes = hasher.finalize();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// =============================================================================
// RATE LIMITER
// =============================================================================

#[derive(Clone)]
pub struct RateLimiter {
    entries: Arc<Mutex<HashMap<String, Instant>>>,
    window: Duration,
}

impl RateLimiter {
    /// Window length comes from `RESET_RATE_LIMIT_WINDOW_MS` (default 30s).
    #[must_use]
    pub fn new() -> Self {
        Self::with_window(Duration::from_millis(env_parse("RESET_RATE_LIMIT_WINDOW_MS", DEFAULT_WINDOW_MS)))
    }

    #[must_use]
    pub fn with_window(window: Duration) -> Self {
        Self { entries: Arc::new(Mutex::new(HashMap::new())), window }
    }

    /// Admit or reject a request for `key`, recording the window start on
    /// admission and scheduling the entry's removal at window end.
    pub fn check_and_record(&self, key: &str) -> Result<(), RateLimitError> {
        let now = Instant::now();
        self.check_and_record_at(key, now)?;
        self.spawn_cleanup(key.to_owned(), now);
        Ok(())
    }

    /// Internal: check + record with explicit timestamp (for testing).
    fn check_and_record_at(&self, key: &str, now: Instant) -> Result<(), RateLimitError> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if let Some(&start) = entries.get(key) {
            let elapsed = now.duration_since(start);
            if elapsed < self.window {
                let remaining = self.window - elapsed;
                return Err(RateLimitError::TooManyRequests { retry_after_secs: ceil_secs(remaining) });
            }
        }

        entries.insert(key.to_owned(), now);
        Ok(())
    }

    fn spawn_cleanup(&self, key: String, stamp: Instant) {
        let limiter = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(limiter.window).await;
            limiter.remove_if_unchanged(&key, stamp);
        });
    }

    /// Remove the entry only if it still belongs to the window that
    /// scheduled this cleanup.
    fn remove_if_unchanged(&self, key: &str, stamp: Instant) {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if entries.get(key) == Some(&stamp) {
            entries.remove(key);
        }
    }

    #[cfg(test)]
    fn window_start(&self, key: &str) -> Option<Instant> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .copied()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

fn ceil_secs(remaining: Duration) -> u64 {
    remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
}

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;
