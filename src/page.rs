use crate::features::{FEATURE_FIELDS, NUM_FEATURES};
use anyhow::{Result, anyhow};
use minijinja::{Environment, context};

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

const FIELD_LABELS: [&str; NUM_FEATURES] = [
    "Nitrogen",
    "Phosphorus",
    "Potassium",
    "Temperature",
    "Humidity",
    "pH",
    "Rainfall",
];

/// The single form page. The `.html` name turns on auto-escaping, so the
/// result string is always inserted as text.
pub struct IndexPage {
    env: Environment<'static>,
}

impl IndexPage {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("index.html", INDEX_TEMPLATE)
            .map_err(|e| anyhow!("Failed to add template: {}", e))?;
        Ok(IndexPage { env })
    }

    pub fn render(&self, result: Option<&str>) -> Result<String> {
        let tmpl = self
            .env
            .get_template("index.html")
            .map_err(|e| anyhow!("Failed to get template: {}", e))?;
        let fields: Vec<_> = FEATURE_FIELDS
            .iter()
            .zip(FIELD_LABELS)
            .map(|(name, label)| context! { name => name, label => label })
            .collect();
        tmpl.render(context! { fields => fields, result => result })
            .map_err(|e| anyhow!("Failed to render template: {}", e))
    }
}
