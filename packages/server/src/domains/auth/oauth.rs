use std::sync::Arc;

use tracing::{debug, info};

use crate::common::ServiceError;
use crate::domains::auth::models::User;
use crate::domains::auth::{Claims, TokenService};
use crate::kernel::traits::BaseOauthProvider;

/// Converts a one-time provider authorization code into a durable local
/// identity token.
///
/// Two provider round-trips, strictly in order: the code buys a provider
/// access token, the access token buys the caller's profile. The profile's
/// numeric id, rendered as a string, becomes the local subject and is minted
/// into a signed token. Failures at either hop surface to the caller; there
/// are no retries.
pub struct OauthExchanger {
    provider: Arc<dyn BaseOauthProvider>,
    tokens: Arc<TokenService>,
}

impl OauthExchanger {
    pub fn new(provider: Arc<dyn BaseOauthProvider>, tokens: Arc<TokenService>) -> Self {
        Self { provider, tokens }
    }

    /// Run the exchange and mint a local token for the provider identity.
    pub async fn exchange(&self, code: &str) -> Result<User, ServiceError> {
        let access_token = self
            .provider
            .exchange_code(code)
            .await
            .map_err(ServiceError::Upstream)?;
        debug!("exchanged authorization code for provider access token");

        let profile = self
            .provider
            .fetch_user(&access_token)
            .await
            .map_err(ServiceError::Upstream)?;

        let subject = profile.id.to_string();
        let jwt = self.tokens.encode(&Claims::for_subject(&subject))?;
        info!(subject = %subject, login = %profile.login, "minted local token for provider identity");

        Ok(User { name: subject, jwt })
    }
}
