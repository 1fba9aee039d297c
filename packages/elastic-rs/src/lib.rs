//! Minimal Elasticsearch client
//!
//! A Mongo-flavored surface over one index of schemaless JSON documents:
//! insert, find, update, delete, and free-text search. Only the document and
//! search APIs this takes are implemented; no bulk API, no scroll, no
//! mapping management.
//!
//! # Example
//!
//! ```rust,ignore
//! use elastic::ElasticClient;
//! use serde_json::json;
//!
//! let client = ElasticClient::new("http://localhost:9200", "item");
//! let id = client.insert(&json!({ "title": "hello" })).await?;
//! let found = client.find_by_id(&id).await?;
//! ```

pub mod error;

pub use error::{ElasticError, Result};

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

/// Outbound request deadline, so a stalled store cannot pin a caller.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fixed result window for list and search calls. Callers that need paging
/// are out of scope for this client.
const RESULT_WINDOW: usize = 10;

/// A document handed back by the store: its assigned id plus the source
/// body, which search responses may omit.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: String,
    pub document: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct IndexResponse {
    #[serde(rename = "_id", default)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source")]
    source: Option<Value>,
    #[serde(default)]
    found: bool,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source")]
    source: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    // Slots may be null in a degraded response; deserialize them rather
    // than failing the whole page.
    #[serde(default)]
    hits: Vec<Option<SearchHit>>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

/// Minimal Elasticsearch API client bound to a single index.
#[derive(Debug, Clone)]
pub struct ElasticClient {
    http_client: Client,
    base_url: String,
    index: String,
}

impl ElasticClient {
    /// Create a client for the given node URL and index.
    pub fn new(base_url: impl Into<String>, index: impl Into<String>) -> Self {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client configuration is valid");

        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            index: index.into(),
        }
    }

    /// Get the node base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the index this client operates on.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Insert a document, returning the id the store assigned to it.
    pub async fn insert(&self, document: &Value) -> Result<String> {
        let response = self
            .http_client
            .post(format!("{}/{}/_doc", self.base_url, self.index))
            .json(document)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Elasticsearch index request failed");
                ElasticError::Network(e.to_string())
            })?;

        let response = check_status(response).await?;

        let indexed: IndexResponse = response
            .json()
            .await
            .map_err(|e| ElasticError::Parse(e.to_string()))?;

        Ok(indexed.id)
    }

    /// Fetch one document by id. Returns `None` when nothing matches.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<StoredDocument>> {
        let response = self
            .http_client
            .get(format!("{}/{}/_doc/{}", self.base_url, self.index, id))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Elasticsearch get request failed");
                ElasticError::Network(e.to_string())
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = check_status(response).await?;

        let fetched: GetResponse = response
            .json()
            .await
            .map_err(|e| ElasticError::Parse(e.to_string()))?;

        if !fetched.found {
            return Ok(None);
        }

        Ok(Some(StoredDocument {
            id: fetched.id,
            document: fetched.source,
        }))
    }

    /// List documents in the index, up to the result window.
    pub async fn find_all(&self) -> Result<Vec<Option<StoredDocument>>> {
        self.run_search(json!({
            "query": { "match_all": {} },
            "size": RESULT_WINDOW,
        }))
        .await
    }

    /// Free-text search across all document fields, up to the result window.
    pub async fn search(&self, query: &str) -> Result<Vec<Option<StoredDocument>>> {
        self.run_search(json!({
            "query": { "query_string": { "query": query } },
            "size": RESULT_WINDOW,
        }))
        .await
    }

    /// Merge fields into the document with the given id. Returns `false`
    /// when no document matched.
    pub async fn update_by_id(&self, id: &str, document: &Value) -> Result<bool> {
        let response = self
            .http_client
            .post(format!("{}/{}/_update/{}", self.base_url, self.index, id))
            .json(&json!({ "doc": document }))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Elasticsearch update request failed");
                ElasticError::Network(e.to_string())
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        check_status(response).await?;
        Ok(true)
    }

    /// Delete the document with the given id. Returns `false` when no
    /// document matched.
    pub async fn delete_by_id(&self, id: &str) -> Result<bool> {
        let response = self
            .http_client
            .delete(format!("{}/{}/_doc/{}", self.base_url, self.index, id))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Elasticsearch delete request failed");
                ElasticError::Network(e.to_string())
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        check_status(response).await?;
        Ok(true)
    }

    /// Liveness probe against the node root.
    pub async fn ping(&self) -> Result<()> {
        let response = self
            .http_client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| ElasticError::Network(e.to_string()))?;

        check_status(response).await?;
        Ok(())
    }

    async fn run_search(&self, body: Value) -> Result<Vec<Option<StoredDocument>>> {
        let response = self
            .http_client
            .post(format!("{}/{}/_search", self.base_url, self.index))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Elasticsearch search request failed");
                ElasticError::Network(e.to_string())
            })?;

        let response = check_status(response).await?;

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| ElasticError::Parse(e.to_string()))?;

        Ok(parsed
            .hits
            .hits
            .into_iter()
            .map(|hit| {
                hit.map(|h| StoredDocument {
                    id: h.id,
                    document: h.source,
                })
            })
            .collect())
    }
}

/// Turn a non-2xx response into an `Api` error carrying the body text.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    warn!(status = %status, error = %error_text, "Elasticsearch API error");
    Err(ElasticError::Api(format!(
        "store returned {}: {}",
        status, error_text
    )))
}
