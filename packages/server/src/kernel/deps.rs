//! Server dependencies (using traits for testability)
//!
//! This module provides the central dependency container handed to services.
//! All external collaborators sit behind trait abstractions so tests can
//! swap them for mocks.

use anyhow::Result;
use async_trait::async_trait;
use elastic::ElasticClient;
use github::GithubClient;
use serde_json::Value;
use std::sync::Arc;

use crate::common::auth::AdminPolicy;
use crate::domains::auth::TokenService;
use crate::kernel::traits::{BaseDocumentStore, BaseOauthProvider, ProviderUser, StoredDocument};

// =============================================================================
// ElasticClient Adapter (implements BaseDocumentStore trait)
// =============================================================================

/// Wrapper around ElasticClient that implements the BaseDocumentStore trait
pub struct ElasticAdapter(pub Arc<ElasticClient>);

impl ElasticAdapter {
    pub fn new(client: Arc<ElasticClient>) -> Self {
        Self(client)
    }
}

fn into_stored(doc: elastic::StoredDocument) -> StoredDocument {
    StoredDocument {
        id: doc.id,
        document: doc.document,
    }
}

#[async_trait]
impl BaseDocumentStore for ElasticAdapter {
    async fn insert(&self, document: &Value) -> Result<String> {
        Ok(self.0.insert(document).await?)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<StoredDocument>> {
        let found = self.0.find_by_id(id).await?;
        Ok(found.map(into_stored))
    }

    async fn find_all(&self) -> Result<Vec<Option<StoredDocument>>> {
        let hits = self.0.find_all().await?;
        Ok(hits.into_iter().map(|hit| hit.map(into_stored)).collect())
    }

    async fn update_by_id(&self, id: &str, document: &Value) -> Result<bool> {
        Ok(self.0.update_by_id(id, document).await?)
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool> {
        Ok(self.0.delete_by_id(id).await?)
    }

    async fn search(&self, query: &str) -> Result<Vec<Option<StoredDocument>>> {
        let hits = self.0.search(query).await?;
        Ok(hits.into_iter().map(|hit| hit.map(into_stored)).collect())
    }

    async fn ping(&self) -> Result<()> {
        Ok(self.0.ping().await?)
    }
}

// =============================================================================
// GithubClient Adapter (implements BaseOauthProvider trait)
// =============================================================================

/// Wrapper around GithubClient that implements the BaseOauthProvider trait
pub struct GithubAdapter(pub Arc<GithubClient>);

impl GithubAdapter {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseOauthProvider for GithubAdapter {
    async fn exchange_code(&self, code: &str) -> Result<String> {
        Ok(self.0.exchange_code(code).await?)
    }

    async fn fetch_user(&self, access_token: &str) -> Result<ProviderUser> {
        let user = self.0.current_user(access_token).await?;
        Ok(ProviderUser {
            id: user.id,
            login: user.login,
        })
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to services (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn BaseDocumentStore>,
    pub oauth_provider: Arc<dyn BaseOauthProvider>,
    /// Token service for signing and validating identity tokens
    pub tokens: Arc<TokenService>,
    /// Allow-list gate for destructive item operations
    pub admin_policy: AdminPolicy,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        store: Arc<dyn BaseDocumentStore>,
        oauth_provider: Arc<dyn BaseOauthProvider>,
        tokens: Arc<TokenService>,
        admin_policy: AdminPolicy,
    ) -> Self {
        Self {
            store,
            oauth_provider,
            tokens,
            admin_policy,
        }
    }
}
