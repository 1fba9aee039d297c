use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::domains::auth::TokenError;

/// Request-path errors for the RPC surface.
///
/// Nothing here is recovered from locally; handlers hand the error to axum
/// and the mapping below decides the wire status. The identity middleware is
/// the one deliberate exception to that rule: it downgrades token failures
/// to an anonymous identity instead of returning an error.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Unauthenticated.")]
    Unauthenticated,

    #[error("You're not an administrator.")]
    Forbidden,

    #[error("Item not found.")]
    NotFound,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Identity provider error: {0}")]
    Upstream(#[source] anyhow::Error),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),

    #[error("Malformed document: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthenticated | ServiceError::Token(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden => StatusCode::FORBIDDEN,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Store(_) | ServiceError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
