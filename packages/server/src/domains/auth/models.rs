use serde::{Deserialize, Serialize};

/// Request envelope carrying a bare credential string: a one-time provider
/// code for `VerifyOauth`, a signed local token for `VerifyJwt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub token: String,
}

/// An authenticated user as the login operations report it: the subject
/// name paired with a signed token for subsequent requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub jwt: String,
}
