//! Items domain - schemaless documents and the operations over them
//!
//! Responsibilities:
//! - The Item model and its document (de)serialization
//! - CRUD and free-text search against the document store
//! - Per-operation access rules (public reads, authenticated creates,
//!   admin-only updates and deletes)

pub mod models;
pub mod service;

pub use models::{Item, ItemQuery, Items, SearchQuery};
pub use service::ItemService;
