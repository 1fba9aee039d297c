//! End-to-end tests for the item RPC operations.
//!
//! Each request travels the full stack: HTTP in, identity middleware, item
//! service, and the mock store behind the trait boundary. The admin-gated
//! operations get the usual three tests each:
//! 1. `*_as_admin_succeeds` - allow-listed caller can perform the action
//! 2. `*_as_non_admin_fails` - authenticated caller off the list gets 403
//! 3. `*_unauthenticated_fails` - anonymous caller gets 401

mod common;

use crate::common::TestHarness;
use serde_json::json;
use server_core::kernel::test_dependencies::{MockDocumentStore, TestDependencies};
use server_core::kernel::traits::StoredDocument;

// ============================================================================
// AddItem
// ============================================================================

#[tokio::test]
async fn add_item_stamps_the_caller_and_returns_the_store_id() {
    let harness = TestHarness::spawn(
        TestDependencies::new().mock_store(MockDocumentStore::new().with_insert_id("item-1")),
    )
    .await
    .expect("Failed to spawn test harness");
    let token = harness.token_for("42");

    let (status, body) = harness
        .rpc(
            "AddItem",
            Some(&token),
            json!({ "item": { "user": "999", "title": "garage sale" } }),
        )
        .await
        .expect("AddItem request failed");

    assert_eq!(status, 200, "Expected success, got: {}", body);
    assert_eq!(body["id"], json!("item-1"));
    assert_eq!(body["user"], json!("42"), "owner comes from the token, not the payload");
    assert_eq!(body["title"], json!("garage sale"));
    assert!(body["createdAt"].as_i64().unwrap_or(0) > 0);

    // The stored document carries the stamped owner and no id of its own.
    let inserted = harness.deps.store.insert_calls();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0]["user"], json!("42"));
    assert!(inserted[0].get("id").is_none());
}

#[tokio::test]
async fn add_item_unauthenticated_fails() {
    let harness = TestHarness::new().await.expect("Failed to spawn test harness");

    let (status, body) = harness
        .rpc("AddItem", None, json!({ "item": { "title": "sofa" } }))
        .await
        .expect("AddItem request failed");

    assert_eq!(status, 401);
    assert_eq!(body["error"], json!("Unauthenticated."));
    assert!(harness.deps.store.insert_calls().is_empty());
}

#[tokio::test]
async fn add_item_with_an_unverifiable_token_fails() {
    let harness = TestHarness::new().await.expect("Failed to spawn test harness");

    // The middleware downgrades the bad token to anonymous instead of
    // failing the request; the operation itself then declines.
    let (status, body) = harness
        .rpc("AddItem", Some("not-a-token"), json!({ "item": { "title": "sofa" } }))
        .await
        .expect("AddItem request failed");

    assert_eq!(status, 401);
    assert_eq!(body["error"], json!("Unauthenticated."));
}

// ============================================================================
// GetItem
// ============================================================================

#[tokio::test]
async fn get_item_returns_the_stored_document() {
    let harness = TestHarness::spawn(TestDependencies::new().mock_store(
        MockDocumentStore::new().with_document("a1", json!({ "user": "42", "title": "sofa" })),
    ))
    .await
    .expect("Failed to spawn test harness");

    let (status, body) = harness
        .rpc("GetItem", None, json!({ "id": "a1" }))
        .await
        .expect("GetItem request failed");

    assert_eq!(status, 200, "Expected success, got: {}", body);
    assert_eq!(body["id"], json!("a1"));
    assert_eq!(body["user"], json!("42"));
    assert_eq!(body["title"], json!("sofa"));
}

#[tokio::test]
async fn get_item_misses_return_404() {
    let harness = TestHarness::new().await.expect("Failed to spawn test harness");

    let (status, body) = harness
        .rpc("GetItem", None, json!({ "id": "missing" }))
        .await
        .expect("GetItem request failed");

    assert_eq!(status, 404);
    assert_eq!(body["error"], json!("Item not found."));
}

// ============================================================================
// GetItems
// ============================================================================

#[tokio::test]
async fn get_items_lists_every_stored_document() {
    let harness = TestHarness::spawn(
        TestDependencies::new().mock_store(
            MockDocumentStore::new()
                .with_document("a1", json!({ "title": "bike" }))
                .with_document("b2", json!({ "title": "sofa" })),
        ),
    )
    .await
    .expect("Failed to spawn test harness");

    let (status, body) = harness
        .rpc("GetItems", None, json!({}))
        .await
        .expect("GetItems request failed");

    assert_eq!(status, 200, "Expected success, got: {}", body);
    let items = body["items"].as_array().expect("items array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], json!("a1"));
    assert_eq!(items[1]["id"], json!("b2"));
}

#[tokio::test]
async fn get_items_skips_unusable_store_entries() {
    let harness = TestHarness::spawn(TestDependencies::new().mock_store(
        MockDocumentStore::new().with_hits(vec![
            None,
            Some(StoredDocument {
                id: "bare".to_string(),
                document: None,
            }),
            Some(StoredDocument {
                id: "good".to_string(),
                document: Some(json!({ "title": "bike" })),
            }),
        ]),
    ))
    .await
    .expect("Failed to spawn test harness");

    let (status, body) = harness
        .rpc("GetItems", None, json!({}))
        .await
        .expect("GetItems request failed");

    assert_eq!(status, 200, "Expected success, got: {}", body);
    let items = body["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], json!("good"));
}

#[tokio::test]
async fn get_items_store_failures_return_500() {
    let harness =
        TestHarness::spawn(TestDependencies::new().mock_store(MockDocumentStore::failing()))
            .await
            .expect("Failed to spawn test harness");

    let (status, body) = harness
        .rpc("GetItems", None, json!({}))
        .await
        .expect("GetItems request failed");

    assert_eq!(status, 500);
    assert!(
        body["error"].as_str().unwrap_or("").contains("Store error"),
        "Expected a store error, got: {}",
        body
    );
}

// ============================================================================
// UpdateItem
// ============================================================================

#[tokio::test]
async fn update_item_as_admin_succeeds() {
    let harness = TestHarness::spawn(
        TestDependencies::new()
            .with_admins(&["42"])
            .mock_store(MockDocumentStore::new().with_document("a1", json!({ "title": "old" }))),
    )
    .await
    .expect("Failed to spawn test harness");
    let token = harness.token_for("42");

    let (status, body) = harness
        .rpc(
            "UpdateItem",
            Some(&token),
            json!({ "id": "a1", "item": { "title": "new" } }),
        )
        .await
        .expect("UpdateItem request failed");

    assert_eq!(status, 200, "Expected success, got: {}", body);
    assert_eq!(body["title"], json!("new"));

    let updates = harness.deps.store.update_calls();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, "a1");
}

#[tokio::test]
async fn update_item_as_non_admin_fails() {
    let harness = TestHarness::spawn(TestDependencies::new().with_admins(&["1"]))
        .await
        .expect("Failed to spawn test harness");
    let token = harness.token_for("42");

    let (status, body) = harness
        .rpc(
            "UpdateItem",
            Some(&token),
            json!({ "id": "a1", "item": { "title": "new" } }),
        )
        .await
        .expect("UpdateItem request failed");

    assert_eq!(status, 403);
    assert_eq!(body["error"], json!("You're not an administrator."));
    assert!(harness.deps.store.update_calls().is_empty());
}

#[tokio::test]
async fn update_item_unauthenticated_fails() {
    let harness = TestHarness::spawn(TestDependencies::new().with_admins(&["42"]))
        .await
        .expect("Failed to spawn test harness");

    let (status, body) = harness
        .rpc(
            "UpdateItem",
            None,
            json!({ "id": "a1", "item": { "title": "new" } }),
        )
        .await
        .expect("UpdateItem request failed");

    assert_eq!(status, 401);
    assert_eq!(body["error"], json!("Unauthenticated."));
    assert!(harness.deps.store.update_calls().is_empty());
}

#[tokio::test]
async fn update_item_against_a_missing_id_fails() {
    let harness = TestHarness::spawn(TestDependencies::new().with_admins(&["42"]))
        .await
        .expect("Failed to spawn test harness");
    let token = harness.token_for("42");

    let (status, _body) = harness
        .rpc(
            "UpdateItem",
            Some(&token),
            json!({ "id": "missing", "item": {} }),
        )
        .await
        .expect("UpdateItem request failed");

    assert_eq!(status, 500);
}

// ============================================================================
// DeleteItem
// ============================================================================

#[tokio::test]
async fn delete_item_as_admin_succeeds() {
    let harness = TestHarness::spawn(
        TestDependencies::new()
            .with_admins(&["42"])
            .mock_store(MockDocumentStore::new().with_document("a1", json!({ "title": "sofa" }))),
    )
    .await
    .expect("Failed to spawn test harness");
    let token = harness.token_for("42");

    let (status, body) = harness
        .rpc("DeleteItem", Some(&token), json!({ "id": "a1" }))
        .await
        .expect("DeleteItem request failed");

    assert_eq!(status, 200, "Expected success, got: {}", body);
    // The request envelope comes back as the deletion receipt.
    assert_eq!(body, json!({ "id": "a1" }));
    assert_eq!(harness.deps.store.delete_calls(), vec!["a1"]);
    assert!(harness.deps.store.documents().is_empty());
}

#[tokio::test]
async fn delete_item_as_non_admin_fails() {
    let harness = TestHarness::spawn(TestDependencies::new().with_admins(&["1"]))
        .await
        .expect("Failed to spawn test harness");
    let token = harness.token_for("42");

    let (status, body) = harness
        .rpc("DeleteItem", Some(&token), json!({ "id": "a1" }))
        .await
        .expect("DeleteItem request failed");

    assert_eq!(status, 403);
    assert_eq!(body["error"], json!("You're not an administrator."));
    assert!(harness.deps.store.delete_calls().is_empty());
}

#[tokio::test]
async fn delete_item_unauthenticated_fails() {
    let harness = TestHarness::spawn(TestDependencies::new().with_admins(&["42"]))
        .await
        .expect("Failed to spawn test harness");

    let (status, body) = harness
        .rpc("DeleteItem", None, json!({ "id": "a1" }))
        .await
        .expect("DeleteItem request failed");

    assert_eq!(status, 401);
    assert_eq!(body["error"], json!("Unauthenticated."));
}

#[tokio::test]
async fn delete_item_against_a_missing_id_fails() {
    let harness = TestHarness::spawn(TestDependencies::new().with_admins(&["42"]))
        .await
        .expect("Failed to spawn test harness");
    let token = harness.token_for("42");

    let (status, _body) = harness
        .rpc("DeleteItem", Some(&token), json!({ "id": "missing" }))
        .await
        .expect("DeleteItem request failed");

    assert_eq!(status, 500);
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn search_is_open_and_passes_the_query_through() {
    let harness = TestHarness::spawn(
        TestDependencies::new().mock_store(
            MockDocumentStore::new()
                .with_document("a1", json!({ "title": "red bike" }))
                .with_document("b2", json!({ "title": "green sofa" })),
        ),
    )
    .await
    .expect("Failed to spawn test harness");

    let (status, body) = harness
        .rpc("Search", None, json!({ "query": "bike" }))
        .await
        .expect("Search request failed");

    assert_eq!(status, 200, "Expected success, got: {}", body);
    let items = body["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], json!("a1"));
    assert_eq!(harness.deps.store.search_calls(), vec!["bike"]);
}
