//! End-to-end tests for the identity operations and the request middleware.
//!
//! VerifyOauth and VerifyJwt are exercised over the wire, along with the
//! fail-open Authorization handling: a header token the middleware cannot
//! verify downgrades the caller to anonymous instead of failing the request,
//! while VerifyJwt reports exactly why the same token is bad.

mod common;

use crate::common::TestHarness;
use serde_json::json;
use server_core::domains::auth::{Claims, TokenService};
use server_core::kernel::test_dependencies::{MockOauthProvider, TestDependencies};

// ============================================================================
// VerifyOauth
// ============================================================================

#[tokio::test]
async fn verify_oauth_exchanges_the_code_and_mints_a_token() {
    let harness = TestHarness::spawn(
        TestDependencies::new()
            .mock_oauth(MockOauthProvider::new().with_user(7690509, "somebody")),
    )
    .await
    .expect("Failed to spawn test harness");

    let (status, body) = harness
        .rpc("VerifyOauth", None, json!({ "token": "one-time-code" }))
        .await
        .expect("VerifyOauth request failed");

    assert_eq!(status, 200, "Expected success, got: {}", body);
    assert_eq!(body["name"], json!("7690509"));

    // The minted token verifies against the server's own secret.
    let jwt = body["jwt"].as_str().expect("jwt string");
    let claims = harness.deps.tokens.decode(jwt).expect("minted token decodes");
    assert_eq!(claims.id, "7690509");

    assert_eq!(
        harness.deps.oauth_provider.exchange_calls(),
        vec!["one-time-code"]
    );
}

#[tokio::test]
async fn verify_oauth_provider_failures_return_502() {
    let harness = TestHarness::spawn(
        TestDependencies::new().mock_oauth(MockOauthProvider::new().failing_exchange()),
    )
    .await
    .expect("Failed to spawn test harness");

    let (status, body) = harness
        .rpc("VerifyOauth", None, json!({ "token": "bad-code" }))
        .await
        .expect("VerifyOauth request failed");

    assert_eq!(status, 502);
    assert!(
        body["error"]
            .as_str()
            .unwrap_or("")
            .contains("Identity provider error"),
        "Expected an upstream error, got: {}",
        body
    );
}

// ============================================================================
// VerifyJwt
// ============================================================================

#[tokio::test]
async fn verify_jwt_names_the_token_subject() {
    let harness = TestHarness::new().await.expect("Failed to spawn test harness");
    let token = harness.token_for("42");

    let (status, body) = harness
        .rpc("VerifyJwt", None, json!({ "token": token }))
        .await
        .expect("VerifyJwt request failed");

    assert_eq!(status, 200, "Expected success, got: {}", body);
    assert_eq!(body["name"], json!("42"));
    assert_eq!(body["jwt"], json!(token));
}

#[tokio::test]
async fn verify_jwt_rejects_an_unverifiable_token() {
    let harness = TestHarness::new().await.expect("Failed to spawn test harness");

    let (status, body) = harness
        .rpc("VerifyJwt", None, json!({ "token": "garbage" }))
        .await
        .expect("VerifyJwt request failed");

    assert_eq!(status, 401);
    assert_eq!(body["error"], json!("token is malformed"));
}

#[tokio::test]
async fn verify_jwt_rejects_a_token_signed_with_another_secret() {
    let harness = TestHarness::new().await.expect("Failed to spawn test harness");

    let foreign = TokenService::new("some_other_secret")
        .encode(&Claims::for_subject("42"))
        .expect("token encodes");

    let (status, body) = harness
        .rpc("VerifyJwt", None, json!({ "token": foreign }))
        .await
        .expect("VerifyJwt request failed");

    assert_eq!(status, 401);
    assert_eq!(body["error"], json!("token signature does not match"));
}

#[tokio::test]
async fn verify_jwt_without_a_token_field_fails() {
    let harness = TestHarness::new().await.expect("Failed to spawn test harness");

    let (status, _body) = harness
        .rpc("VerifyJwt", None, json!({}))
        .await
        .expect("VerifyJwt request failed");

    assert_eq!(status, 401);
}

// ============================================================================
// Identity middleware
// ============================================================================

#[tokio::test]
async fn a_bad_authorization_header_does_not_block_open_operations() {
    let harness = TestHarness::new().await.expect("Failed to spawn test harness");

    // The same string VerifyJwt rejects outright rides along harmlessly on
    // an open operation.
    let (status, body) = harness
        .rpc("GetItems", Some("garbage"), json!({}))
        .await
        .expect("GetItems request failed");
    assert_eq!(status, 200, "Expected success, got: {}", body);

    let (status, _body) = harness
        .rpc("VerifyJwt", None, json!({ "token": "garbage" }))
        .await
        .expect("VerifyJwt request failed");
    assert_eq!(status, 401);
}

#[tokio::test]
async fn an_expired_token_downgrades_the_caller_to_anonymous() {
    let harness = TestHarness::new().await.expect("Failed to spawn test harness");

    let mut claims = Claims::for_subject("42");
    claims.extra.insert(
        "exp".to_string(),
        json!(chrono::Utc::now().timestamp() - 3600),
    );
    let expired = harness.deps.tokens.encode(&claims).expect("token encodes");

    // AddItem sees an anonymous caller, not a token error.
    let (status, body) = harness
        .rpc("AddItem", Some(&expired), json!({ "item": {} }))
        .await
        .expect("AddItem request failed");

    assert_eq!(status, 401);
    assert_eq!(body["error"], json!("Unauthenticated."));
}

#[tokio::test]
async fn a_scheme_prefixed_header_is_not_accepted() {
    let harness = TestHarness::spawn(TestDependencies::new().with_admins(&["42"]))
        .await
        .expect("Failed to spawn test harness");
    let token = harness.token_for("42");

    // The header carries the bare token; a Bearer prefix makes it
    // unverifiable and the caller anonymous.
    let (status, body) = harness
        .rpc(
            "AddItem",
            Some(&format!("Bearer {}", token)),
            json!({ "item": {} }),
        )
        .await
        .expect("AddItem request failed");

    assert_eq!(status, 401);
    assert_eq!(body["error"], json!("Unauthenticated."));
}
