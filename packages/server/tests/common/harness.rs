//! Test harness that spawns the app on an ephemeral port.
//!
//! The document store and the identity provider both sit behind traits, so
//! the whole server runs against in-memory mocks: no containers, no network
//! beyond the loopback listener. Each harness owns its own server task and
//! keeps handles to the mocks for call assertions.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use serde_json::Value;
use server_core::kernel::TestDependencies;
use server_core::server::build_app;

pub struct TestHarness {
    pub base_url: String,
    pub client: reqwest::Client,
    /// The mocks serving the app, kept for call assertions.
    pub deps: TestDependencies,
}

impl TestHarness {
    /// Spawn the app over default dependencies.
    pub async fn new() -> Result<Self> {
        Self::spawn(TestDependencies::new()).await
    }

    /// Spawn the app over the given dependencies.
    pub async fn spawn(deps: TestDependencies) -> Result<Self> {
        // Initialize tracing subscriber to respect RUST_LOG environment variable.
        // Uses try_init() to avoid panicking if already initialized.
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let app = build_app(deps.clone().into_deps());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind test listener")?;
        let addr: SocketAddr = listener
            .local_addr()
            .context("Failed to read listener address")?;

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            client: reqwest::Client::new(),
            deps,
        })
    }

    /// POST an RPC operation, returning the status and the JSON body.
    ///
    /// The token, when given, is sent raw in the Authorization header; the
    /// server does not expect a scheme prefix.
    pub async fn rpc(&self, op: &str, token: Option<&str>, body: Value) -> Result<(u16, Value)> {
        let mut request = self
            .client
            .post(format!("{}/rpc/{}", self.base_url, op))
            .json(&body);

        if let Some(token) = token {
            request = request.header("Authorization", token);
        }

        let response = request.send().await.context("RPC request failed")?;
        let status = response.status().as_u16();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);

        Ok((status, body))
    }

    /// GET a plain path, returning the status and the JSON body.
    pub async fn get(&self, path: &str) -> Result<(u16, Value)> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .context("GET request failed")?;

        let status = response.status().as_u16();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);

        Ok((status, body))
    }

    /// Mint a token for the given subject, signed with the harness secret.
    pub fn token_for(&self, subject: &str) -> String {
        self.deps.token_for(subject)
    }
}
