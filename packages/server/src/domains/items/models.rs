use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Item - one schemaless document on the board
///
/// Three fields are server-owned: `id` is assigned by the store on insert,
/// and `user` / `createdAt` are stamped at creation over whatever the client
/// sent. Every other field rides in `fields` untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Item {
    /// Store-assigned identifier; empty until the item has been stored
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Subject of the authenticated creator
    #[serde(default)]
    pub user: String,

    /// Server clock at insert time, seconds since the epoch
    #[serde(rename = "createdAt", default)]
    pub created_at: i64,

    /// The rest of the document
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Item {
    /// The storable body of this item. The id travels next to the document
    /// in the store, not inside it.
    pub fn to_document(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Rebuild an item from a stored body, tagged with the id the store
    /// returned alongside it. A stale id inside the body loses.
    pub fn from_document(id: &str, document: Value) -> Result<Self, serde_json::Error> {
        let mut item: Item = serde_json::from_value(document)?;
        item.id = id.to_string();
        Ok(item)
    }
}

/// Uniform request envelope for the item operations: an id, a payload, or
/// both, depending on the operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemQuery {
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
}

/// Response envelope for list-shaped operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Items {
    pub items: Vec<Item>,
}

/// Free-text search request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}
