//! Profile exchange — turns a bearer token into the user it belongs to.

use uuid::Uuid;

use crate::roles::Role;
use crate::services::session::SessionUser;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("profile request failed: {0}")]
    Request(String),
    #[error("profile exchange rejected: status {status}")]
    Rejected { status: u16, body: String },
    #[error("profile response parse failed: {0}")]
    Parse(String),
}

/// Token-to-profile exchange against the upstream API.
#[async_trait::async_trait]
pub trait ProfileApi: Send + Sync {
    async fn fetch_profile(&self, token: &str) -> Result<SessionUser, ProfileError>;
}

#[derive(Debug, serde::Deserialize)]
struct ProfileResponse {
    id: Uuid,
    email: String,
    name: String,
    role: String,
}

/// HTTP implementation against the upstream storefront API.
pub struct HttpProfileApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpProfileApi {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_owned(), client: reqwest::Client::new() }
    }
}

#[async_trait::async_trait]
impl ProfileApi for HttpProfileApi {
    async fn fetch_profile(&self, token: &str) -> Result<SessionUser, ProfileError> {
        let resp = self
            .client
            .get(format!("{}/api/auth/profile", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ProfileError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ProfileError::Rejected { status, body });
        }

        let profile: ProfileResponse = resp
            .json()
            .await
            .map_err(|e| ProfileError::Parse(e.to_string()))?;

        Ok(SessionUser {
            id: profile.id,
            email: profile.email,
            name: profile.name,
            role: Role::parse(&profile.role),
        })
    }
}
