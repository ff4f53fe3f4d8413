mod guard;
mod rate_limit;
mod roles;
mod routes;
mod services;
mod state;
mod upstream;

use std::net::SocketAddr;
use std::sync::Arc;

use services::persist::{FileSessionStorage, MemorySessionStorage, SessionStorage};
use services::profile::HttpProfileApi;
use services::session::SessionStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let upstream_url = std::env::var("UPSTREAM_API_URL").expect("UPSTREAM_API_URL required");
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    // Session survives restarts only when a file is configured.
    let storage: Arc<dyn SessionStorage> = match std::env::var("SESSION_FILE") {
        Ok(path) => Arc::new(FileSessionStorage::new(path.into())),
        Err(_) => {
            tracing::warn!("SESSION_FILE not set — session will not survive restarts");
            Arc::new(MemorySessionStorage::new())
        }
    };

    let profile = Arc::new(HttpProfileApi::new(&upstream_url));
    let session = SessionStore::new(storage, profile);
    session.hydrate().await;

    let api = upstream::ApiClient::new(&upstream_url, session.clone());
    let state = state::AppState::new(session, api, rate_limit::RateLimiter::new());

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, upstream = %upstream_url, "storegate listening");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .expect("server failed");
}
