//! mycm - MyCm social post generator
//!
//! Turns a business profile and a topic idea into a ready-to-publish post:
//! copy text and hashtags from a text model, plus an image from an image model.

pub mod api;
pub mod composer;
pub mod config;
pub mod error;
pub mod http;
pub mod images;
pub mod pipeline;
pub mod post;
pub mod text;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

pub use config::Settings;
pub use error::{ErrorKind, PostError, ProviderError};
pub use pipeline::{Pipeline, PipelineError};
pub use post::{BusinessProfile, FinishedPost, GeneratedImage, GeneratedPost, PostRequest};

/// The mycm server instance
pub struct Server {
    bind_addr: SocketAddr,
    pipeline: Arc<Pipeline>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Server {
    /// Create a new server instance with providers built from settings
    pub fn new(settings: &Settings) -> Result<Self> {
        let pipeline = Pipeline::from_settings(settings)?;
        Ok(Self::with_pipeline(settings.bind_addr, pipeline))
    }

    /// Create a server around an already-built pipeline
    pub fn with_pipeline(bind_addr: SocketAddr, pipeline: Pipeline) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            bind_addr,
            pipeline: Arc::new(pipeline),
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Get the pipeline handle
    pub fn pipeline(&self) -> Arc<Pipeline> {
        self.pipeline.clone()
    }

    /// Build the router
    fn router(&self) -> Router {
        api::router(self.pipeline.clone())
    }

    /// Run the server until shutdown
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.bind_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("mycm listening on {}", local_addr);

        let router = self.router();
        let mut shutdown_rx = self.shutdown_rx.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_rx.changed().await.ok();
            })
            .await?;

        info!("mycm shutdown complete");
        Ok(())
    }

    /// Signal the server to shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
