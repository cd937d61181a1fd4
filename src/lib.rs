pub mod artifacts;
pub mod classifier;
pub mod error;
pub mod features;
pub mod labels;
pub mod page;
pub mod predictor;
pub mod scaler;
pub mod server;
pub mod state;

use server::{init_logging, startup};
use state::{AppState, ServerConfig};
use tokio::signal;

/// Load the artifacts and serve until the server stops or Ctrl+C arrives.
/// Artifact problems abort before the socket is bound.
pub fn run(config: ServerConfig) -> anyhow::Result<()> {
    init_logging(config.log_level);

    let app_state = AppState::new(&config).map_err(|e| {
        log::error!("Failed to load model artifacts from {}: {}", config.artifact_dir.display(), e);
        e
    })?;

    let res: std::io::Result<()> = actix_web::rt::System::new().block_on(async move {
        tokio::select! {
            res = startup(config, app_state) => res,
            _ = signal::ctrl_c() => {
                log::info!("Received Ctrl+C, shutting down");
                Ok(())
            }
        }
    });
    res?;
    Ok(())
}
