//! TestServer - runs a real mycm server on a random port
//!
//! Providers are configured through `Settings`, so the server exercises the
//! same construction path as the binary.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use mycm::config::{ImageProviderKind, TextProviderKind};
use mycm::{Server, Settings};
use reqwest::Client;
use tokio::task::JoinHandle;

use super::stub::StubProvider;

/// Test harness that spawns a real mycm server on a random port
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    server: Arc<Server>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Settings pointing the Gemini and Stability clients at stubs
    pub fn settings(text: &StubProvider, image: &StubProvider) -> Settings {
        let mut settings = Settings::default();
        settings.request_timeout_secs = 5;

        settings.text.provider = TextProviderKind::Gemini;
        settings.text.base_url = Some(text.base_url());
        settings.text.api_key = Some("test-google-key".to_string());

        settings.image.provider = ImageProviderKind::Stability;
        settings.image.api_host = image.base_url();
        settings.image.api_key = Some("test-stability-key".to_string());

        settings
    }

    /// Settings using the built-in fake providers
    pub fn fake_settings() -> Settings {
        let mut settings = Settings::default();
        settings.text.provider = TextProviderKind::Fake;
        settings.image.provider = ImageProviderKind::Fake;
        settings
    }

    /// Start a new test server instance
    pub async fn start(mut settings: Settings) -> Result<Self> {
        // Find a random available port
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        drop(listener);

        settings.bind_addr = addr;

        let server = Arc::new(Server::new(&settings)?);
        let addr = server.bind_addr();
        let server_clone = server.clone();

        // Spawn the server in a background task
        let handle = tokio::spawn(async move {
            if let Err(e) = server_clone.run().await {
                eprintln!("Server error: {}", e);
            }
        });

        // Wait for server to be ready
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        // Poll until server is ready (max 2 seconds)
        let mut ready = false;
        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if client
                .get(format!("http://{}/health", addr))
                .send()
                .await
                .is_ok()
            {
                ready = true;
                break;
            }
        }

        if !ready {
            panic!("Server failed to start within 2 seconds");
        }

        Ok(Self {
            addr,
            client,
            server,
            _handle: handle,
        })
    }

    /// Provider names of the running server's pipeline (text, image)
    pub fn providers(&self) -> (&'static str, &'static str) {
        let pipeline = self.server.pipeline();
        (
            pipeline.composer().provider().provider_name(),
            pipeline.fetcher().provider().provider_name(),
        )
    }

    /// Get the base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(format!("{}{}", self.base_url(), path))
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}{}", self.base_url(), path))
            .json(body)
            .send()
            .await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.shutdown();
    }
}
