use crate::error::{PredictError, PredictResult};
use std::collections::HashMap;

pub const NUM_FEATURES: usize = 7;

/// Form field names in feature order. The second entry keeps the form's
/// spelling; `PHOSPHORUS_ALIAS` is accepted as well.
pub const FEATURE_FIELDS: [&str; NUM_FEATURES] = [
    "Nitrogen",
    "Phosporus",
    "Potassium",
    "Temperature",
    "Humidity",
    "Ph",
    "Rainfall",
];

const PHOSPHORUS_ALIAS: &str = "Phosphorus";

/// [nitrogen, phosphorus, potassium, temperature, humidity, ph, rainfall]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; NUM_FEATURES]);

impl FeatureVector {
    pub fn new(values: [f64; NUM_FEATURES]) -> Self {
        FeatureVector(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

fn lookup<'a>(form: &'a HashMap<String, String>, field: &str) -> Option<&'a String> {
    match form.get(field) {
        Some(value) => Some(value),
        None if field == FEATURE_FIELDS[1] => form.get(PHOSPHORUS_ALIAS),
        None => None,
    }
}

fn parse_field(field: &str, raw: &str) -> PredictResult<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|e| PredictError::input(field, format!("'{}' is not a number ({})", raw, e)))?;
    if !value.is_finite() {
        return Err(PredictError::input(field, format!("'{}' is not finite", raw)));
    }
    Ok(value)
}

/// Parse the seven measurements out of the submitted form.
pub fn assemble(form: &HashMap<String, String>) -> PredictResult<FeatureVector> {
    let mut values = [0.0; NUM_FEATURES];
    for (slot, field) in values.iter_mut().zip(FEATURE_FIELDS) {
        let raw = lookup(form, field).ok_or_else(|| PredictError::input(field, "missing"))?;
        *slot = parse_field(field, raw)?;
    }
    Ok(FeatureVector(values))
}
