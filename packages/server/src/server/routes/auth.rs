//! RPC handlers for the login operations

use axum::{extract::Extension, Json};

use crate::common::ServiceError;
use crate::domains::auth::models::{TokenRequest, User};
use crate::server::app::AxumAppState;

/// Trade a provider authorization code for a local identity token.
pub async fn verify_oauth(
    Extension(state): Extension<AxumAppState>,
    Json(req): Json<TokenRequest>,
) -> Result<Json<User>, ServiceError> {
    Ok(Json(state.items.verify_oauth(req).await?))
}

/// Strictly validate an existing token. Decode failures surface here as
/// errors, unlike on the fail-open middleware path.
pub async fn verify_jwt(
    Extension(state): Extension<AxumAppState>,
    Json(req): Json<TokenRequest>,
) -> Result<Json<User>, ServiceError> {
    Ok(Json(state.items.verify_jwt(req).await?))
}
