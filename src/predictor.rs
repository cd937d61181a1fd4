use crate::classifier::Classifier;
use crate::error::PredictResult;
use crate::features::{self, FeatureVector};
use crate::labels;
use crate::scaler::ScalingPipeline;
use std::collections::HashMap;
use std::sync::Arc;

pub const FAILURE_MESSAGE: &str =
    "Error processing the prediction. Please check the input values and try again.";

pub fn recommendation(crop: &str) -> String {
    format!("{} is the best crop to be cultivated right there.", crop)
}

/// Scaling, classification and label lookup over injected components.
#[derive(Clone)]
pub struct Predictor {
    scaling: ScalingPipeline,
    classifier: Arc<dyn Classifier>,
}

impl Predictor {
    pub fn new(scaling: ScalingPipeline, classifier: Arc<dyn Classifier>) -> Self {
        Predictor {
            scaling,
            classifier,
        }
    }

    pub fn predict_label(&self, features: &FeatureVector) -> PredictResult<i64> {
        let scaled = self.scaling.apply(features.as_slice())?;
        self.classifier.predict(&scaled)
    }

    pub fn predict_crop(&self, features: &FeatureVector) -> PredictResult<&'static str> {
        Ok(labels::crop_name(self.predict_label(features)?))
    }

    /// Run the whole form-to-sentence path. Errors are logged and replaced by
    /// [`FAILURE_MESSAGE`].
    pub fn recommend(&self, form: &HashMap<String, String>) -> String {
        let result = features::assemble(form).and_then(|features| self.predict_crop(&features));
        match result {
            Ok(crop) => {
                log::debug!("Predicted {} for {:?}", crop, form);
                recommendation(crop)
            }
            Err(e) => {
                log::error!("Error: {}", e);
                FAILURE_MESSAGE.to_string()
            }
        }
    }
}
