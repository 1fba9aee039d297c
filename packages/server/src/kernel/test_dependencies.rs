// TestDependencies - mock implementations for testing
//
// Provides mock collaborators that can be wired into ServerDeps for tests,
// including the integration tests that spawn the whole app.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::common::auth::AdminPolicy;
use crate::domains::auth::TokenService;
use crate::domains::items::ItemService;
use crate::kernel::deps::ServerDeps;
use crate::kernel::traits::{BaseDocumentStore, BaseOauthProvider, ProviderUser, StoredDocument};

// =============================================================================
// Mock Document Store
// =============================================================================

/// In-memory document store with call recording.
///
/// Acts as a small working store by default: inserts are listed, found,
/// updated, deleted, and substring-searched. List and search results can be
/// overridden wholesale with `with_hits` to exercise degraded store
/// responses, and `failing()` makes every operation error.
pub struct MockDocumentStore {
    documents: Arc<Mutex<Vec<(String, Option<Value>)>>>,
    seeded_hits: Arc<Mutex<Vec<Vec<Option<StoredDocument>>>>>,
    insert_ids: Arc<Mutex<Vec<String>>>,
    insert_calls: Arc<Mutex<Vec<Value>>>,
    update_calls: Arc<Mutex<Vec<(String, Value)>>>,
    delete_calls: Arc<Mutex<Vec<String>>>,
    search_calls: Arc<Mutex<Vec<String>>>,
    failing: bool,
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(Mutex::new(Vec::new())),
            seeded_hits: Arc::new(Mutex::new(Vec::new())),
            insert_ids: Arc::new(Mutex::new(Vec::new())),
            insert_calls: Arc::new(Mutex::new(Vec::new())),
            update_calls: Arc::new(Mutex::new(Vec::new())),
            delete_calls: Arc::new(Mutex::new(Vec::new())),
            search_calls: Arc::new(Mutex::new(Vec::new())),
            failing: false,
        }
    }

    /// A store whose every operation fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new()
        }
    }

    /// Seed a document under a fixed id
    pub fn with_document(self, id: &str, document: Value) -> Self {
        self.documents
            .lock()
            .unwrap()
            .push((id.to_string(), Some(document)));
        self
    }

    /// Seed an entry that has an id but no document body
    pub fn with_documentless(self, id: &str) -> Self {
        self.documents.lock().unwrap().push((id.to_string(), None));
        self
    }

    /// Queue an id to be handed out by the next insert (instead of a UUID)
    pub fn with_insert_id(self, id: &str) -> Self {
        self.insert_ids.lock().unwrap().push(id.to_string());
        self
    }

    /// Queue a raw result page for the next list or search call
    pub fn with_hits(self, hits: Vec<Option<StoredDocument>>) -> Self {
        self.seeded_hits.lock().unwrap().push(hits);
        self
    }

    /// Get all documents that were inserted
    pub fn insert_calls(&self) -> Vec<Value> {
        self.insert_calls.lock().unwrap().clone()
    }

    /// Get all (id, document) pairs that were updated
    pub fn update_calls(&self) -> Vec<(String, Value)> {
        self.update_calls.lock().unwrap().clone()
    }

    /// Get all ids that were deleted
    pub fn delete_calls(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }

    /// Get all search queries that were run
    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    /// Get the current store contents
    pub fn documents(&self) -> Vec<(String, Option<Value>)> {
        self.documents.lock().unwrap().clone()
    }

    fn check_available(&self) -> Result<()> {
        if self.failing {
            return Err(anyhow!("store is offline"));
        }
        Ok(())
    }
}

impl Default for MockDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseDocumentStore for MockDocumentStore {
    async fn insert(&self, document: &Value) -> Result<String> {
        self.check_available()?;
        self.insert_calls.lock().unwrap().push(document.clone());

        let mut queued = self.insert_ids.lock().unwrap();
        let id = if queued.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            queued.remove(0)
        };
        drop(queued);

        self.documents
            .lock()
            .unwrap()
            .push((id.clone(), Some(document.clone())));
        Ok(id)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<StoredDocument>> {
        self.check_available()?;

        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .find(|(stored_id, _)| stored_id == id)
            .map(|(stored_id, document)| StoredDocument {
                id: stored_id.clone(),
                document: document.clone(),
            }))
    }

    async fn find_all(&self) -> Result<Vec<Option<StoredDocument>>> {
        self.check_available()?;

        let mut seeded = self.seeded_hits.lock().unwrap();
        if !seeded.is_empty() {
            return Ok(seeded.remove(0));
        }
        drop(seeded);

        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .map(|(id, document)| {
                Some(StoredDocument {
                    id: id.clone(),
                    document: document.clone(),
                })
            })
            .collect())
    }

    async fn update_by_id(&self, id: &str, document: &Value) -> Result<bool> {
        self.check_available()?;
        self.update_calls
            .lock()
            .unwrap()
            .push((id.to_string(), document.clone()));

        let mut documents = self.documents.lock().unwrap();
        match documents.iter_mut().find(|(stored_id, _)| stored_id == id) {
            Some((_, body)) => {
                *body = Some(document.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool> {
        self.check_available()?;
        self.delete_calls.lock().unwrap().push(id.to_string());

        let mut documents = self.documents.lock().unwrap();
        let before = documents.len();
        documents.retain(|(stored_id, _)| stored_id != id);
        Ok(documents.len() < before)
    }

    async fn search(&self, query: &str) -> Result<Vec<Option<StoredDocument>>> {
        self.check_available()?;
        self.search_calls.lock().unwrap().push(query.to_string());

        let mut seeded = self.seeded_hits.lock().unwrap();
        if !seeded.is_empty() {
            return Ok(seeded.remove(0));
        }
        drop(seeded);

        // Crude but sufficient stand-in for a text index: substring match on
        // the serialized document.
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, document)| {
                document
                    .as_ref()
                    .is_some_and(|doc| doc.to_string().contains(query))
            })
            .map(|(id, document)| {
                Some(StoredDocument {
                    id: id.clone(),
                    document: document.clone(),
                })
            })
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        self.check_available()
    }
}

// =============================================================================
// Mock OAuth Provider
// =============================================================================

/// Scripted identity provider with call recording.
pub struct MockOauthProvider {
    user: ProviderUser,
    access_token: String,
    fail_exchange: bool,
    fail_fetch: bool,
    exchange_calls: Arc<Mutex<Vec<String>>>,
    fetch_calls: Arc<Mutex<Vec<String>>>,
}

impl MockOauthProvider {
    pub fn new() -> Self {
        Self {
            user: ProviderUser {
                id: 1138,
                login: "testuser".to_string(),
            },
            access_token: "gho_mock_token".to_string(),
            fail_exchange: false,
            fail_fetch: false,
            exchange_calls: Arc::new(Mutex::new(Vec::new())),
            fetch_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the identity the provider reports
    pub fn with_user(mut self, id: i64, login: &str) -> Self {
        self.user = ProviderUser {
            id,
            login: login.to_string(),
        };
        self
    }

    /// Set the access token the exchange hands out
    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = token.to_string();
        self
    }

    /// Make the code exchange fail
    pub fn failing_exchange(mut self) -> Self {
        self.fail_exchange = true;
        self
    }

    /// Make the profile fetch fail
    pub fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    /// Get all codes that were exchanged
    pub fn exchange_calls(&self) -> Vec<String> {
        self.exchange_calls.lock().unwrap().clone()
    }

    /// Get all access tokens that were used for profile fetches
    pub fn fetch_calls(&self) -> Vec<String> {
        self.fetch_calls.lock().unwrap().clone()
    }
}

impl Default for MockOauthProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseOauthProvider for MockOauthProvider {
    async fn exchange_code(&self, code: &str) -> Result<String> {
        self.exchange_calls.lock().unwrap().push(code.to_string());

        if self.fail_exchange {
            return Err(anyhow!("provider refused the code exchange"));
        }
        Ok(self.access_token.clone())
    }

    async fn fetch_user(&self, access_token: &str) -> Result<ProviderUser> {
        self.fetch_calls
            .lock()
            .unwrap()
            .push(access_token.to_string());

        if self.fail_fetch {
            return Err(anyhow!("provider refused the profile fetch"));
        }
        Ok(self.user.clone())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Bundle of mocks plus the real token service, ready to become ServerDeps.
#[derive(Clone)]
pub struct TestDependencies {
    pub store: Arc<MockDocumentStore>,
    pub oauth_provider: Arc<MockOauthProvider>,
    pub tokens: Arc<TokenService>,
    pub admin_subjects: Vec<String>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MockDocumentStore::new()),
            oauth_provider: Arc::new(MockOauthProvider::new()),
            tokens: Arc::new(TokenService::new("test_secret_key")),
            admin_subjects: Vec::new(),
        }
    }

    /// Set a mock document store
    pub fn mock_store(mut self, store: MockDocumentStore) -> Self {
        self.store = Arc::new(store);
        self
    }

    /// Set a mock OAuth provider
    pub fn mock_oauth(mut self, provider: MockOauthProvider) -> Self {
        self.oauth_provider = Arc::new(provider);
        self
    }

    /// Set the admin allow-list
    pub fn with_admins(mut self, subjects: &[&str]) -> Self {
        self.admin_subjects = subjects.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Mint a token for the given subject, signed with the test secret
    pub fn token_for(&self, subject: &str) -> String {
        self.tokens
            .encode(&crate::domains::auth::Claims::for_subject(subject))
            .expect("test token encodes")
    }

    /// Convert into a ServerDeps container
    pub fn into_deps(self) -> ServerDeps {
        ServerDeps::new(
            self.store,
            self.oauth_provider,
            self.tokens,
            AdminPolicy::new(self.admin_subjects),
        )
    }

    /// Convert into an ItemService for service-level tests
    pub fn into_service(self) -> ItemService {
        ItemService::new(self.into_deps())
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
