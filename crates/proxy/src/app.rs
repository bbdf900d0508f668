//! Main application structure and lifecycle management

use crate::api::ApiServer;
use anyhow::{Context, Result};
use config::{Configuration, ReadyConfig, StorageEnvironment};
use std::sync::Arc;
use tracing::info;

/// Main application state.
///
/// Read-only after boot; handlers share it through an `Arc` without locking.
#[derive(Debug)]
pub struct AppState {
    pub config: Arc<Configuration>,
    pub storage: StorageEnvironment,
}

/// Main application that coordinates all components
pub struct Application {
    state: Arc<AppState>,
    api_server: ApiServer,
}

impl Application {
    /// Create a new application instance from a finished boot
    pub fn new(ready: ReadyConfig) -> Result<Self> {
        info!("Initializing application components...");

        let state = Arc::new(AppState {
            config: ready.config,
            storage: ready.storage,
        });

        let api_server = ApiServer::new(state.clone()).context("Failed to create API server")?;

        info!("Application components initialized successfully");

        Ok(Self { state, api_server })
    }

    /// Run the application
    pub async fn run(&mut self) -> Result<()> {
        info!(
            bucket = %self.state.storage.bucket,
            region = %self.state.storage.region,
            "Starting application services..."
        );

        self.api_server.run().await.context("API server error")
    }

    /// Shutdown the application gracefully
    pub async fn shutdown(&mut self) -> Result<()> {
        info!("Shutting down application...");

        self.api_server
            .shutdown()
            .await
            .context("Failed to shutdown API server")?;
        info!("API server shutdown complete");

        info!("Application shutdown complete");
        Ok(())
    }

    /// Get application state
    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }
}
