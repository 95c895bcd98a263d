//! Settings for one schema generation run.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Schema creator settings.
///
/// ```toml
/// generate_examples = true
/// prefer_alias = false
/// example_seed = 7
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Attach generated examples to schemas that have none
    pub generate_examples: bool,
    /// Key record properties by alias when the field has one
    pub prefer_alias: bool,
    /// Seed for reproducible examples; entropy-seeded when unset
    pub example_seed: Option<u64>,
    /// Merge validated-model library types into the type table
    pub include_model_extensions: bool,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            generate_examples: false,
            prefer_alias: true,
            example_seed: None,
            include_model_extensions: true,
        }
    }
}

impl SchemaConfig {
    /// Parse settings from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, SchemaError> {
        Ok(toml::from_str(source)?)
    }
}
