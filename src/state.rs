use crate::artifacts::Artifacts;
use crate::page::IndexPage;
use crate::predictor::Predictor;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub artifact_dir: PathBuf,
    pub workers: Option<usize>,
    pub log_level: log::LevelFilter,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            artifact_dir: PathBuf::from("."),
            workers: None,
            log_level: log::LevelFilter::Info,
        }
    }
}

/// Read-only state shared by every worker.
pub struct AppState {
    pub predictor: Predictor,
    pub page: IndexPage,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let predictor = Artifacts::load(&config.artifact_dir)?.into_predictor();
        Self::with_predictor(predictor)
    }

    pub fn with_predictor(predictor: Predictor) -> anyhow::Result<Self> {
        Ok(Self {
            predictor,
            page: IndexPage::new()?,
        })
    }
}
