use crate::common::auth::Identity;
use crate::domains::auth::TokenService;
use axum::{middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;

/// Identity resolution middleware
///
/// Reads the raw token from the Authorization header, validates it, and adds
/// an Identity to request extensions. A missing, empty, or invalid token
/// resolves to Identity::Anonymous rather than an error: the same surface
/// serves public and restricted operations, so rejecting bad credentials
/// here would break the public half. Handlers always find an Identity.
///
/// The header carries the bare token, no `Bearer ` scheme prefix.
pub async fn identity_middleware(
    tokens: Arc<TokenService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok());

    let identity = resolve_identity(header, &tokens);
    match &identity {
        Identity::Authenticated { subject } => debug!(subject = %subject, "Authenticated request"),
        Identity::Anonymous => debug!("Anonymous request"),
    }

    request.extensions_mut().insert(identity);
    next.run(request).await
}

/// Map a raw Authorization header value to an identity
fn resolve_identity(header: Option<&str>, tokens: &TokenService) -> Identity {
    let Some(token) = header else {
        return Identity::Anonymous;
    };

    if token.is_empty() {
        return Identity::Anonymous;
    }

    match tokens.decode(token) {
        Ok(claims) => Identity::authenticated(claims.id),
        Err(_) => Identity::Anonymous,
    }
}
