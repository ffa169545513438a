use anyhow::{Context, Result};
use tracing::info;

use titanic_survival::config::Settings;
use titanic_survival::model::ModelHolder;
use titanic_survival::server::ApiServer;
use titanic_survival::telemetry;

/// Main entry point for the survival predictor.
///
/// Loads settings, initialises logging, loads the model once and serves the
/// form until the process is stopped. A model that fails to load does not
/// stop startup; the page then reports that predictions are unavailable.
///
/// # Errors
/// Returns an error if the configuration is invalid or the server cannot bind
#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new().context("failed to load configuration")?;

    // Keep the guard alive so buffered log lines are flushed on exit
    let _guard = telemetry::init(&settings.logging);

    info!("Titanic survival predictor starting up...");
    if let Some(dir) = &settings.logging.file {
        info!("Log directory: {}", dir.display());
    }

    let model = ModelHolder::load(&settings.model.path);

    let server = ApiServer::new(model, settings.server.host.clone(), settings.server.port);
    server.start().await.context("server error")?;

    Ok(())
}
