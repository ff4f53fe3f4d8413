use super::*;

use crate::roles::Role;
use crate::state::test_helpers::{RecordingTransport, signed_in_session, test_session};

fn client_with(session: SessionStore) -> (ApiClient, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::new());
    let api = ApiClient::with_transport("https://api.example.test/", session, transport.clone());
    (api, transport)
}

// =============================================================================
// BEARER ATTACHMENT
// =============================================================================

#[tokio::test]
async fn attaches_bearer_for_a_valid_session() {
    let session = signed_in_session(Role::User).await;
    let token = session.bearer_token().await.unwrap();
    let (api, transport) = client_with(session);

    api.get("/api/catalog").await.unwrap();

    let req = transport.last_request().unwrap();
    assert_eq!(req.method, reqwest::Method::GET);
    assert_eq!(req.url, "https://api.example.test/api/catalog");
    assert_eq!(req.bearer.as_deref(), Some(token.as_str()));
}

#[tokio::test]
async fn sends_no_bearer_when_signed_out() {
    let session = test_session(Role::User);
    session.hydrate().await;
    let (api, transport) = client_with(session);

    api.get("/api/catalog").await.unwrap();

    assert!(transport.last_request().unwrap().bearer.is_none());
}

// =============================================================================
// EXPIRY SHORT-CIRCUIT
// =============================================================================

#[tokio::test]
async fn expired_session_fails_locally_without_a_network_call() {
    let session = signed_in_session(Role::User).await;
    session.force_expired().await;
    let (api, transport) = client_with(session.clone());

    let err = api.get("/api/catalog").await.unwrap_err();
    assert!(matches!(err, UpstreamError::SessionExpired));
    assert_eq!(transport.request_count(), 0);

    // Detection does not clear the session; that is the caller's decision.
    assert!(session.bearer_token().await.is_some());
}

#[tokio::test]
async fn every_call_after_expiry_stays_rejected() {
    let session = signed_in_session(Role::Store).await;
    session.force_expired().await;
    let (api, transport) = client_with(session);

    for _ in 0..3 {
        assert!(matches!(api.get("/api/store/orders").await, Err(UpstreamError::SessionExpired)));
    }
    assert_eq!(transport.request_count(), 0);
}

// =============================================================================
// RESPONSE HANDLING
// =============================================================================

#[tokio::test]
async fn unauthorized_forces_logout_and_still_propagates() {
    let session = signed_in_session(Role::Store).await;
    let (api, transport) = client_with(session.clone());
    transport.push_response(401, r#"{"message":"token revoked"}"#);

    let resp = api.get("/api/store/orders").await.unwrap();
    assert_eq!(resp.status, 401);
    assert!(resp.body.contains("token revoked"));

    assert!(!session.is_authenticated().await);
    assert!(session.bearer_token().await.is_none());
    assert!(session.current_user().await.is_none());
}

#[tokio::test]
async fn other_error_statuses_propagate_and_keep_the_session() {
    let session = signed_in_session(Role::User).await;
    let (api, transport) = client_with(session.clone());
    transport.push_response(503, r#"{"message":"maintenance"}"#);

    let resp = api.get("/api/catalog").await.unwrap();
    assert_eq!(resp.status, 503);
    assert!(resp.body.contains("maintenance"));
    assert!(session.is_authenticated().await);
}

#[tokio::test]
async fn success_body_passes_through_unchanged() {
    let session = test_session(Role::User);
    session.hydrate().await;
    let (api, transport) = client_with(session);
    transport.push_response(200, r#"{"items":[1,2,3]}"#);

    let resp = api.get("/api/catalog").await.unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, r#"{"items":[1,2,3]}"#);
}

#[tokio::test]
async fn post_sends_the_json_body() {
    let session = test_session(Role::User);
    session.hydrate().await;
    let (api, transport) = client_with(session);

    api.post_json("/api/cart", serde_json::json!({"sku": "X1", "qty": 2}))
        .await
        .unwrap();

    let req = transport.last_request().unwrap();
    assert_eq!(req.method, reqwest::Method::POST);
    assert_eq!(req.body.unwrap()["sku"], "X1");
}
