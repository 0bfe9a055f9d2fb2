//! Integration tests for session resolution against the identity service.


use fixtures::{expired_jwt, harness, valid_jwt};
use serde_json::json;
use wiremock::matchers::{bearer_token, method, path};
use wiremock::{Mock, ResponseTemplate};

use authgate::SessionStatus;

#[tokio::test]
async fn test_session_starts_resolving() {
    let h = harness().await;
    let session = h.manager.session().await;
    assert_eq!(session.status, SessionStatus::Resolving);
    assert!(session.user.is_none());
}

#[tokio::test]
async fn test_resolve_without_credential_makes_no_network_call() {
    let h = harness().await;

    // Any identity call would be a contract violation
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    h.manager.resolve_session().await;

    let session = h.manager.session().await;
    assert_eq!(session.status, SessionStatus::Unauthenticated);
    assert!(session.user.is_none());
}

#[tokio::test]
async fn test_resolve_with_expired_credential_makes_no_network_call() {
    let h = harness().await;
    h.store.write(&expired_jwt()).unwrap();

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    h.manager.resolve_session().await;

    let session = h.manager.session().await;
    assert_eq!(session.status, SessionStatus::Unauthenticated);
    // The stale credential is destroyed during resolution
    assert_eq!(h.store.read(), None);
}

#[tokio::test]
async fn test_resolve_with_valid_credential_confirms_identity() {
    let h = harness().await;
    let token = valid_jwt();
    h.store.write(&token).unwrap();

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(bearer_token(token.as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "user": { "id": 1, "name": "A" } })),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    h.manager.resolve_session().await;

    let session = h.manager.session().await;
    assert_eq!(session.status, SessionStatus::Authenticated);
    let user = session.user.expect("authenticated session carries a user");
    assert_eq!(user.id(), Some(&json!(1)));
    assert_eq!(user.name(), Some("A"));
    // Profile is merged with the credential that proved it
    assert_eq!(user.access_token(), Some(token.as_str()));
}

#[tokio::test]
async fn test_resolve_fails_closed_on_service_error() {
    let h = harness().await;
    h.store.write(&valid_jwt()).unwrap();

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&h.server)
        .await;

    h.manager.resolve_session().await;

    let session = h.manager.session().await;
    assert_eq!(session.status, SessionStatus::Unauthenticated);
    assert!(session.user.is_none());
}

#[tokio::test]
async fn test_resolve_fails_closed_on_large_multibyte_error_body() {
    let h = harness().await;
    h.store.write(&valid_jwt()).unwrap();

    // 600-byte body of 3-byte characters: truncation must not split one
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(500).set_body_string("€".repeat(200)))
        .mount(&h.server)
        .await;

    h.manager.resolve_session().await;

    let session = h.manager.session().await;
    assert_eq!(session.status, SessionStatus::Unauthenticated);
    assert!(session.user.is_none());
}

#[tokio::test]
async fn test_resolve_fails_closed_on_malformed_payload() {
    let h = harness().await;
    h.store.write(&valid_jwt()).unwrap();

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&h.server)
        .await;

    h.manager.resolve_session().await;

    assert_eq!(
        h.manager.session().await.status,
        SessionStatus::Unauthenticated
    );
}

#[tokio::test]
async fn test_resolution_is_idempotent_with_stable_credential() {
    let h = harness().await;
    let token = valid_jwt();
    h.store.write(&token).unwrap();

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "user": { "id": 1, "name": "A" } })),
        )
        .expect(2)
        .mount(&h.server)
        .await;

    h.manager.resolve_session().await;
    assert_eq!(
        h.manager.session().await.status,
        SessionStatus::Authenticated
    );

    h.manager.resolve_session().await;
    assert_eq!(
        h.manager.session().await.status,
        SessionStatus::Authenticated
    );
}
