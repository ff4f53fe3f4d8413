//! Authenticated upstream API client.
//!
//! ARCHITECTURE
//! ============
//! Every outbound call to the storefront API funnels through `ApiClient`,
//! which consults the session store before and after the wire: a token that
//! is present but expired short-circuits locally (no network round-trip),
//! a valid one is attached as a bearer header, and a 401 from any endpoint
//! forces a sign-out while the original response still reaches the caller.
//! The wire itself sits behind the `HttpTransport` trait so tests can
//! observe exactly what would have been sent.

use std::sync::Arc;

use crate::services::session::SessionStore;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The stored token expired; the call was rejected before the wire.
    #[error("session expired")]
    SessionExpired,
    #[error("upstream request failed: {0}")]
    Request(String),
}

/// One outbound request, fully described.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: reqwest::Method,
    pub url: String,
    pub bearer: Option<String>,
    pub body: Option<serde_json::Value>,
}

/// Upstream response, status and raw body. Non-success statuses are data
/// here, not errors — they propagate to the caller unchanged.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: OutboundRequest) -> Result<UpstreamResponse, UpstreamError>;
}

// =============================================================================
// REQWEST TRANSPORT
// =============================================================================

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    #[must_use]
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: OutboundRequest) -> Result<UpstreamResponse, UpstreamError> {
        let mut req = self.client.request(request.method, &request.url);
        if let Some(token) = &request.bearer {
            req = req.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| UpstreamError::Request(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| UpstreamError::Request(e.to_string()))?;
        Ok(UpstreamResponse { status, body })
    }
}

// =============================================================================
// API CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    session: SessionStore,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: &str, session: SessionStore) -> Self {
        Self::with_transport(base_url, session, Arc::new(ReqwestTransport::new()))
    }

    #[must_use]
    pub fn with_transport(base_url: &str, session: SessionStore, transport: Arc<dyn HttpTransport>) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_owned(), transport, session }
    }

    /// `GET` against the upstream API.
    ///
    /// # Errors
    ///
    /// `SessionExpired` if the stored token lapsed (no call is made), or
    /// `Request` on transport failure.
    pub async fn get(&self, path: &str) -> Result<UpstreamResponse, UpstreamError> {
        self.send(reqwest::Method::GET, path, None).await
    }

    /// `POST` a JSON body against the upstream API.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`].
    pub async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<UpstreamResponse, UpstreamError> {
        self.send(reqwest::Method::POST, path, Some(body)).await
    }

    async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let bearer = self.session.bearer_token().await;
        if bearer.is_some() && !self.session.check_session_expiry().await {
            return Err(UpstreamError::SessionExpired);
        }

        let request = OutboundRequest { method, url: format!("{}{path}", self.base_url), bearer, body };
        let resp = self.transport.execute(request).await?;

        if resp.status == 401 {
            tracing::warn!(%path, "upstream rejected the session token, signing out");
            self.session.logout().await;
        }

        Ok(resp)
    }
}

#[cfg(test)]
#[path = "upstream_test.rs"]
mod tests;
