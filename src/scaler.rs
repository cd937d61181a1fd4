use crate::error::{ArtifactError, ArtifactResult, PredictError, PredictResult};
use serde::Deserialize;
use std::sync::Arc;

/// A per-feature transform whose parameters are fixed once loaded.
pub trait Transform: Send + Sync {
    fn dim(&self) -> usize;

    fn transform(&self, input: &[f64]) -> PredictResult<Vec<f64>>;

    fn check_dim(&self, input: &[f64]) -> PredictResult<()> {
        if input.len() != self.dim() {
            return Err(PredictError::Dimension {
                expected: self.dim(),
                actual: input.len(),
            });
        }
        Ok(())
    }
}

/// Serialized form of [`StandardScaler`].
#[derive(Debug, Clone, Deserialize)]
pub struct StandardParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// `(x - mean) / scale`
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "StandardParams")]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> ArtifactResult<Self> {
        StandardParams { mean, scale }.try_into()
    }
}

impl TryFrom<StandardParams> for StandardScaler {
    type Error = ArtifactError;

    fn try_from(params: StandardParams) -> ArtifactResult<Self> {
        if params.mean.len() != params.scale.len() {
            return Err(ArtifactError::invalid(
                "standscaler",
                format!(
                    "mean has {} entries but scale has {}",
                    params.mean.len(),
                    params.scale.len()
                ),
            ));
        }
        if let Some(i) = params.mean.iter().position(|m| !m.is_finite()) {
            return Err(ArtifactError::invalid(
                "standscaler",
                format!("mean[{}] is not finite", i),
            ));
        }
        if let Some(i) = params
            .scale
            .iter()
            .position(|s| !s.is_finite() || *s == 0.0)
        {
            return Err(ArtifactError::invalid(
                "standscaler",
                format!("scale[{}] must be finite and non-zero", i),
            ));
        }
        Ok(StandardScaler {
            mean: params.mean,
            scale: params.scale,
        })
    }
}

impl Transform for StandardScaler {
    fn dim(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, input: &[f64]) -> PredictResult<Vec<f64>> {
        self.check_dim(input)?;
        Ok(input
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }
}

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// Serialized form of [`MinMaxScaler`].
#[derive(Debug, Clone, Deserialize)]
pub struct MinMaxParams {
    pub data_min: Vec<f64>,
    pub data_max: Vec<f64>,
    #[serde(default = "default_feature_range")]
    pub feature_range: (f64, f64),
    #[serde(default)]
    pub clip: bool,
}

/// `x * scale + min`, mapping `[data_min, data_max]` onto `feature_range`.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "MinMaxParams")]
pub struct MinMaxScaler {
    scale: Vec<f64>,
    min: Vec<f64>,
    feature_range: (f64, f64),
    clip: bool,
}

impl MinMaxScaler {
    pub fn new(
        data_min: Vec<f64>,
        data_max: Vec<f64>,
        feature_range: (f64, f64),
        clip: bool,
    ) -> ArtifactResult<Self> {
        MinMaxParams {
            data_min,
            data_max,
            feature_range,
            clip,
        }
        .try_into()
    }
}

impl TryFrom<MinMaxParams> for MinMaxScaler {
    type Error = ArtifactError;

    fn try_from(params: MinMaxParams) -> ArtifactResult<Self> {
        let (lo, hi) = params.feature_range;
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(ArtifactError::invalid(
                "minmaxscaler",
                format!("feature_range ({}, {}) is not increasing", lo, hi),
            ));
        }
        if params.data_min.len() != params.data_max.len() {
            return Err(ArtifactError::invalid(
                "minmaxscaler",
                format!(
                    "data_min has {} entries but data_max has {}",
                    params.data_min.len(),
                    params.data_max.len()
                ),
            ));
        }
        let mut scale = Vec::with_capacity(params.data_min.len());
        let mut min = Vec::with_capacity(params.data_min.len());
        for (i, (dmin, dmax)) in params.data_min.iter().zip(&params.data_max).enumerate() {
            if !(dmin.is_finite() && dmax.is_finite()) || dmin > dmax {
                return Err(ArtifactError::invalid(
                    "minmaxscaler",
                    format!("invalid bounds [{}, {}] for feature {}", dmin, dmax, i),
                ));
            }
            // constant features map onto `lo`
            let width = if dmax > dmin { dmax - dmin } else { 1.0 };
            let s = (hi - lo) / width;
            scale.push(s);
            min.push(lo - dmin * s);
        }
        Ok(MinMaxScaler {
            scale,
            min,
            feature_range: params.feature_range,
            clip: params.clip,
        })
    }
}

impl Transform for MinMaxScaler {
    fn dim(&self) -> usize {
        self.scale.len()
    }

    fn transform(&self, input: &[f64]) -> PredictResult<Vec<f64>> {
        self.check_dim(input)?;
        let (lo, hi) = self.feature_range;
        Ok(input
            .iter()
            .zip(self.scale.iter().zip(&self.min))
            .map(|(x, (scale, min))| {
                let y = x * scale + min;
                if self.clip { y.clamp(lo, hi) } else { y }
            })
            .collect())
    }
}

/// Standardization followed by min-max rescaling, always in that order.
#[derive(Clone)]
pub struct ScalingPipeline {
    standard: Arc<dyn Transform>,
    min_max: Arc<dyn Transform>,
}

impl ScalingPipeline {
    pub fn new(standard: Arc<dyn Transform>, min_max: Arc<dyn Transform>) -> Self {
        ScalingPipeline { standard, min_max }
    }

    pub fn apply(&self, input: &[f64]) -> PredictResult<Vec<f64>> {
        let standardized = self.standard.transform(input)?;
        self.min_max.transform(&standardized)
    }
}
