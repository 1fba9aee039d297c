//! Auth domain - login via GitHub OAuth, identity via signed tokens
//!
//! Flow:
//!   VerifyOauth → provider code exchange → profile fetch → local JWT
//!   VerifyJwt   → strict validation of an existing local JWT
//!
//! Responsibilities:
//! - Signing and validating identity tokens
//! - Driving the two-hop OAuth exchange against the provider
//! - Request/response models for the login operations

pub mod jwt;
pub mod models;
pub mod oauth;

pub use jwt::{Claims, TokenError, TokenService};
pub use models::{TokenRequest, User};
pub use oauth::OauthExchanger;
