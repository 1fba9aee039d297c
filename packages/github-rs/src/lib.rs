//! Minimal GitHub API client
//!
//! Covers exactly two endpoints: the OAuth authorization-code exchange and
//! the authenticated current-user lookup. The exchange endpoint answers in
//! `application/x-www-form-urlencoded` unless asked otherwise, so the access
//! token is pulled out of the raw body text; see [`parse_access_token`].
//!
//! # Example
//!
//! ```rust,ignore
//! use github::GithubClient;
//!
//! let client = GithubClient::new(client_id, client_secret);
//! let access_token = client.exchange_code(code).await?;
//! let user = client.current_user(&access_token).await?;
//! println!("authenticated as {} (#{})", user.login, user.id);
//! ```

pub mod error;

pub use error::{GithubError, Result};

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Outbound request deadline, so a stalled provider cannot pin a caller.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Request body for the authorization-code exchange.
#[derive(Debug, Serialize)]
struct AccessTokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
}

/// The authenticated GitHub user, reduced to the fields callers read.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubUser {
    pub id: i64,
    pub login: String,
}

/// Minimal GitHub API client.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http_client: Client,
    client_id: String,
    client_secret: String,
    oauth_base_url: String,
    api_base_url: String,
}

impl GithubClient {
    /// Create a client for the given OAuth application credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client configuration is valid");

        Self {
            http_client,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            oauth_base_url: "https://github.com".to_string(),
            api_base_url: "https://api.github.com".to_string(),
        }
    }

    /// Set a custom OAuth endpoint base (for GitHub Enterprise, proxies, tests).
    pub fn with_oauth_base_url(mut self, url: impl Into<String>) -> Self {
        self.oauth_base_url = url.into();
        self
    }

    /// Set a custom REST API base (for GitHub Enterprise, proxies, tests).
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Get the OAuth endpoint base URL.
    pub fn oauth_base_url(&self) -> &str {
        &self.oauth_base_url
    }

    /// Get the REST API base URL.
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Exchange a one-time authorization code for an access token.
    ///
    /// Posts the application credentials plus the caller's code, then pulls
    /// the token out of the form-encoded response body.
    pub async fn exchange_code(&self, code: &str) -> Result<String> {
        let request = AccessTokenRequest {
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            code,
        };

        let response = self
            .http_client
            .post(format!("{}/login/oauth/access_token", self.oauth_base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "GitHub code exchange request failed");
                GithubError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "GitHub code exchange error");
            return Err(GithubError::Api(format!(
                "code exchange returned {}: {}",
                status, error_text
            )));
        }

        let contents = response
            .text()
            .await
            .map_err(|e| GithubError::Network(e.to_string()))?;

        parse_access_token(&contents)
    }

    /// Fetch the user the given access token belongs to.
    pub async fn current_user(&self, access_token: &str) -> Result<GithubUser> {
        let response = self
            .http_client
            .get(format!("{}/user", self.api_base_url))
            .bearer_auth(access_token)
            // The REST API rejects requests without a User-Agent.
            .header(reqwest::header::USER_AGENT, "github-rs")
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "GitHub user request failed");
                GithubError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "GitHub user endpoint error");
            return Err(GithubError::Api(format!(
                "user fetch returned {}: {}",
                status, error_text
            )));
        }

        response
            .json::<GithubUser>()
            .await
            .map_err(|e| GithubError::Parse(e.to_string()))
    }
}

/// Extract the access token from a code-exchange response body.
///
/// The default response format is form-encoded, e.g.
/// `access_token=abc123&scope=repo&token_type=bearer`: the token is whatever
/// sits between the first `=` and the next `&`. Provider error bodies share
/// that shape, so they parse to their first value and fail later at the user
/// fetch instead of here.
pub fn parse_access_token(body: &str) -> Result<String> {
    let after_key = body.split('=').nth(1).ok_or_else(|| {
        GithubError::Parse(format!("no `=` delimiter in exchange response: {body:?}"))
    })?;

    let token = after_key.split('&').next().unwrap_or(after_key);

    Ok(token.to_string())
}
