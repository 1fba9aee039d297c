//! Identity and authorization primitives
//!
//! Callers are resolved to an [`Identity`] once per request by the identity
//! middleware; services receive it explicitly and apply [`AdminPolicy`] where
//! an operation is restricted:
//!
//! ```rust,ignore
//! use crate::common::auth::{AdminPolicy, Identity};
//!
//! // In a service method:
//! if !deps.admin_policy.is_admin(&identity) {
//!     return Err(ServiceError::Forbidden);
//! }
//! ```
//!
//! This keeps authorization decisions in the service layer, not in the HTTP
//! handler layer.

mod identity;
mod policy;

pub use identity::Identity;
pub use policy::AdminPolicy;
