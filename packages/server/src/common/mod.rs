// Common types and utilities shared across the application

pub mod auth;
pub mod errors;

pub use auth::{AdminPolicy, Identity};
pub use errors::ServiceError;
