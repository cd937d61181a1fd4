//! Loading of the serialized scalers and classifier.
//!
//! All three files must load and agree on the feature count before the
//! server starts; there is no partially loaded state.

use crate::classifier::{Classifier, RandomForest};
use crate::error::{ArtifactError, ArtifactResult};
use crate::features::NUM_FEATURES;
use crate::predictor::Predictor;
use crate::scaler::{MinMaxScaler, ScalingPipeline, StandardScaler, Transform};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const MODEL_FILE: &str = "model.json";
pub const STANDARD_SCALER_FILE: &str = "standscaler.json";
pub const MIN_MAX_SCALER_FILE: &str = "minmaxscaler.json";

pub struct Artifacts {
    pub standard: StandardScaler,
    pub min_max: MinMaxScaler,
    pub model: RandomForest,
}

fn read_json<T: DeserializeOwned>(path: PathBuf) -> ArtifactResult<T> {
    let bytes = std::fs::read(&path).map_err(|source| ArtifactError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Malformed { path, source })
}

fn check_dim(name: &str, dim: usize) -> ArtifactResult<()> {
    if dim != NUM_FEATURES {
        return Err(ArtifactError::invalid(
            name,
            format!("expects {} features, the form provides {}", dim, NUM_FEATURES),
        ));
    }
    Ok(())
}

impl Artifacts {
    pub fn load(dir: &Path) -> ArtifactResult<Self> {
        let standard: StandardScaler = read_json(dir.join(STANDARD_SCALER_FILE))?;
        check_dim("standscaler", standard.dim())?;

        let min_max: MinMaxScaler = read_json(dir.join(MIN_MAX_SCALER_FILE))?;
        check_dim("minmaxscaler", min_max.dim())?;

        let model: RandomForest = read_json(dir.join(MODEL_FILE))?;
        check_dim("model", model.n_features())?;

        log::info!(
            "Loaded artifacts from {}: {} classes",
            dir.display(),
            model.classes().len()
        );
        Ok(Artifacts {
            standard,
            min_max,
            model,
        })
    }

    pub fn into_predictor(self) -> Predictor {
        let scaling = ScalingPipeline::new(Arc::new(self.standard), Arc::new(self.min_max));
        Predictor::new(scaling, Arc::new(self.model))
    }
}
