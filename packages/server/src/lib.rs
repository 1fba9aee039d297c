// Pinboard - API Core
//
// Backend for a shared pinboard of schemaless JSON items: GitHub OAuth login,
// JWT identity on every request, and CRUD plus free-text search over an
// Elasticsearch index. Reads are public; writes require identity, and
// destructive writes require an allow-listed administrator.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
