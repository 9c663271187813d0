//! Common test utilities for integration tests.

use std::net::SocketAddr;

use anyhow::Result;
use reqwest::Client;
use tokio::task::JoinHandle;

use statewise_engine::StateEngine;
use statewise_server::config::ServerConfig;
use statewise_server::state::AppState;

/// Header carrying the session token.
pub const SESSION_HEADER: &str = "x-session-token";

/// A test server that runs in the background.
pub struct TestServer {
    /// The server's address.
    pub addr: SocketAddr,
    /// HTTP client for this server.
    pub client: Client,
    /// Handle to the server task.
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a test server with the default (15-minute) session TTL.
    pub async fn start() -> Result<Self> {
        Self::start_with_ttl_secs(ServerConfig::default().session_ttl_secs).await
    }

    /// Start a test server with a custom session TTL.
    pub async fn start_with_ttl_secs(session_ttl_secs: i64) -> Result<Self> {
        let config = ServerConfig {
            session_ttl_secs,
            ..ServerConfig::default()
        };
        let engine = StateEngine::with_demo_catalog(config.session_ttl());
        let state = AppState::new(config, engine);
        let app = statewise_server::app(state);

        // Bind before spawning so requests can connect immediately
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            client: Client::new(),
            _handle: handle,
        })
    }

    /// Get the full URL for a path on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Create a session and return its token.
    pub async fn create_session(&self) -> Result<String> {
        let resp = self
            .client
            .post(self.url("/api/sessions"))
            .json(&serde_json::json!({}))
            .send()
            .await?;
        anyhow::ensure!(resp.status().as_u16() == 201, "session create failed");

        let body: serde_json::Value = resp.json().await?;
        let token = body
            .get("id")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| anyhow::anyhow!("no session id in response"))?;
        Ok(token.to_owned())
    }

    /// GET a path with a session token attached.
    pub fn get_with_session(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(path)).header(SESSION_HEADER, token)
    }

    /// POST a JSON body with a session token attached.
    pub fn post_with_session(
        &self,
        path: &str,
        token: &str,
        body: &serde_json::Value,
    ) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .header(SESSION_HEADER, token)
            .json(body)
    }

    /// DELETE a path with a session token attached.
    pub fn delete_with_session(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .delete(self.url(path))
            .header(SESSION_HEADER, token)
    }
}
