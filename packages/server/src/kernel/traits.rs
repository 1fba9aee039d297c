// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. Rules like "who
// may delete an item" live in the domain services that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseDocumentStore)

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

// =============================================================================
// Document Store Trait (Infrastructure - keyed JSON documents + search)
// =============================================================================

/// A document handed back by the store: its assigned id plus the body,
/// which the store may omit.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: String,
    pub document: Option<Value>,
}

/// Key-addressed collection of schemaless JSON documents with a free-text
/// search index over it.
///
/// List-shaped results keep one slot per entry, and a slot may be empty.
/// Callers skip empty slots and document-less entries rather than failing.
#[async_trait]
pub trait BaseDocumentStore: Send + Sync {
    /// Insert a document and return the id the store assigned
    async fn insert(&self, document: &Value) -> Result<String>;

    /// Fetch one document by id; `None` when nothing matches
    async fn find_by_id(&self, id: &str) -> Result<Option<StoredDocument>>;

    /// List documents, up to the store's result window
    async fn find_all(&self) -> Result<Vec<Option<StoredDocument>>>;

    /// Replace fields of the document with the given id; `false` when
    /// nothing matched
    async fn update_by_id(&self, id: &str, document: &Value) -> Result<bool>;

    /// Delete the document with the given id; `false` when nothing matched
    async fn delete_by_id(&self, id: &str) -> Result<bool>;

    /// Free-text search over the collection
    async fn search(&self, query: &str) -> Result<Vec<Option<StoredDocument>>>;

    /// Cheap liveness probe for health reporting
    async fn ping(&self) -> Result<()>;
}

// =============================================================================
// OAuth Provider Trait (Infrastructure - external identity)
// =============================================================================

/// The provider-side identity of an authenticated caller.
#[derive(Debug, Clone)]
pub struct ProviderUser {
    /// Provider-issued numeric identifier; rendered as a string it becomes
    /// the local subject
    pub id: i64,
    pub login: String,
}

/// The two-endpoint surface of the external identity provider.
#[async_trait]
pub trait BaseOauthProvider: Send + Sync {
    /// Exchange a one-time authorization code for an access token
    async fn exchange_code(&self, code: &str) -> Result<String>;

    /// Fetch the identity the access token belongs to
    async fn fetch_user(&self, access_token: &str) -> Result<ProviderUser>;
}
