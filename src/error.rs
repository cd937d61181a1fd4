use std::path::PathBuf;

/// Per-request failures. All of them collapse into the same user-facing
/// message at the handler; the variant only shows up in the log.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("Invalid input for field '{field}': {reason}")]
    Input { field: String, reason: String },

    #[error("Dimension mismatch: expected {expected} features, got {actual}")]
    Dimension { expected: usize, actual: usize },

    #[error("Inference failed: {0}")]
    Inference(String),
}

impl PredictError {
    pub fn input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PredictError::Input {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Startup failures while loading the serialized artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed artifact {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid artifact {name}: {reason}")]
    Invalid { name: String, reason: String },
}

impl ArtifactError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ArtifactError::Invalid {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type PredictResult<T> = Result<T, PredictError>;
pub type ArtifactResult<T> = Result<T, ArtifactError>;
