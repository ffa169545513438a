use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use axum::{Router, routing::{get, post}};
use tracing::{info, warn};

use crate::model::ModelHolder;
use super::routes;

/// Builds the application router around a model holder.
pub fn router(model: Arc<ModelHolder>) -> Router {
    Router::new()
        .route("/", get(routes::index).post(routes::index))
        .route("/health", get(routes::health_check))
        .route("/api/v1/model", get(routes::model_status))
        .route("/api/v1/predict", post(routes::predict))
        .with_state(model)
}

/// HTTP server for the prediction form and API
pub struct ApiServer {
    model: Arc<ModelHolder>,
    host: String,
    port: u16,
}

impl ApiServer {
    pub fn new(model: ModelHolder, host: String, port: u16) -> Self {
        if !model.is_available() {
            warn!("Starting without a model; prediction requests will not be served");
        }

        info!("Creating new API server on {}:{}", host, port);
        Self {
            model: Arc::new(model),
            host,
            port,
        }
    }

    pub async fn start(&self) -> Result<()> {
        let app = router(Arc::clone(&self.model));

        info!("Starting server on {}:{}", self.host, self.port);
        let listener = TcpListener::bind((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("failed to bind {}:{}", self.host, self.port))?;

        info!("Server started successfully");
        axum::serve(listener, app).await.context("server stopped with an error")?;
        Ok(())
    }
}
