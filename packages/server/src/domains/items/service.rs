//! Item service - the operations behind the RPC surface
//!
//! One service carries all eight operations so the transport layer stays a
//! thin bridge. Access rules per operation:
//!   - GetItem / GetItems / Search: public
//!   - AddItem: any authenticated caller
//!   - UpdateItem / DeleteItem: allow-listed administrators only
//!   - VerifyOauth / VerifyJwt: public (they establish identity)

use chrono::Utc;
use tracing::info;

use crate::common::auth::Identity;
use crate::common::ServiceError;
use crate::domains::auth::models::{TokenRequest, User};
use crate::domains::auth::OauthExchanger;
use crate::domains::items::models::{Item, ItemQuery, SearchQuery};
use crate::kernel::deps::ServerDeps;
use crate::kernel::traits::StoredDocument;

pub struct ItemService {
    deps: ServerDeps,
    oauth: OauthExchanger,
}

impl ItemService {
    pub fn new(deps: ServerDeps) -> Self {
        let oauth = OauthExchanger::new(deps.oauth_provider.clone(), deps.tokens.clone());
        Self { deps, oauth }
    }

    /// Insert a new item. `user` and `createdAt` are stamped server-side,
    /// whatever the payload claimed.
    pub async fn add_item(
        &self,
        identity: &Identity,
        req: ItemQuery,
    ) -> Result<Item, ServiceError> {
        let Some(subject) = identity.subject() else {
            return Err(ServiceError::Unauthenticated);
        };

        let mut item = req.item.unwrap_or_default();
        item.user = subject.to_string();
        item.created_at = Utc::now().timestamp();

        let document = item.to_document()?;
        let id = self.deps.store.insert(&document).await?;
        if id.is_empty() {
            return Err(ServiceError::Store(anyhow::anyhow!(
                "store returned no id for the inserted item"
            )));
        }

        item.id = id;
        info!(id = %item.id, user = %item.user, "item created");
        Ok(item)
    }

    /// Fetch one item by id.
    pub async fn get_item(&self, req: ItemQuery) -> Result<Item, ServiceError> {
        let found = self.deps.store.find_by_id(&req.id).await?;

        // An entry without a body is as good as no entry.
        let Some(StoredDocument {
            id,
            document: Some(document),
        }) = found
        else {
            return Err(ServiceError::NotFound);
        };

        Ok(Item::from_document(&id, document)?)
    }

    /// List items, newest window first as the store orders them.
    pub async fn get_items(&self) -> Result<Vec<Item>, ServiceError> {
        let results = self.deps.store.find_all().await?;
        collect_items(results)
    }

    /// Replace an item by id. Admin only; the submitted payload is echoed
    /// back on success.
    pub async fn update_item(
        &self,
        identity: &Identity,
        req: ItemQuery,
    ) -> Result<Item, ServiceError> {
        self.require_admin(identity)?;

        let item = req.item.unwrap_or_default();
        let document = item.to_document()?;

        let matched = self.deps.store.update_by_id(&req.id, &document).await?;
        if !matched {
            return Err(ServiceError::Store(anyhow::anyhow!(
                "update matched no item"
            )));
        }

        info!(id = %req.id, "item updated");
        Ok(item)
    }

    /// Delete an item by id. Admin only; the request envelope is echoed
    /// back on success.
    pub async fn delete_item(
        &self,
        identity: &Identity,
        req: ItemQuery,
    ) -> Result<ItemQuery, ServiceError> {
        self.require_admin(identity)?;

        let matched = self.deps.store.delete_by_id(&req.id).await?;
        if !matched {
            return Err(ServiceError::Store(anyhow::anyhow!(
                "delete matched no item"
            )));
        }

        info!(id = %req.id, "item deleted");
        Ok(req)
    }

    /// Free-text search over the whole collection.
    pub async fn search(&self, req: SearchQuery) -> Result<Vec<Item>, ServiceError> {
        let results = self.deps.store.search(&req.query).await?;
        collect_items(results)
    }

    /// Trade a provider authorization code for a local identity token.
    pub async fn verify_oauth(&self, req: TokenRequest) -> Result<User, ServiceError> {
        self.oauth.exchange(&req.token).await
    }

    /// Validate an existing token and name its subject.
    ///
    /// Unlike the request middleware, which quietly downgrades bad tokens to
    /// an anonymous identity, this reports exactly why a token failed.
    pub async fn verify_jwt(&self, req: TokenRequest) -> Result<User, ServiceError> {
        let claims = self.deps.tokens.decode(&req.token)?;
        Ok(User {
            name: claims.id,
            jwt: req.token,
        })
    }

    /// Authentication first, then the allow-list: an anonymous caller gets
    /// Unauthenticated, a known caller off the list gets Forbidden.
    fn require_admin(&self, identity: &Identity) -> Result<(), ServiceError> {
        if !identity.is_authenticated() {
            return Err(ServiceError::Unauthenticated);
        }
        if !self.deps.admin_policy.is_admin(identity) {
            return Err(ServiceError::Forbidden);
        }
        Ok(())
    }
}

/// Convert raw store results into items: empty slots and document-less
/// entries are skipped, every kept item is tagged with its store id.
fn collect_items(results: Vec<Option<StoredDocument>>) -> Result<Vec<Item>, ServiceError> {
    let mut items = Vec::with_capacity(results.len());

    for result in results {
        let Some(stored) = result else { continue };
        let Some(document) = stored.document else {
            continue;
        };
        items.push(Item::from_document(&stored.id, document)?);
    }

    Ok(items)
}
