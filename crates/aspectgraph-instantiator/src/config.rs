//! Session configuration.

use crate::InstantiateError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How names are synthesized for anonymous (blank-node) elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnonymousNaming {
    /// `Trait1`, `Trait2`, ... in instantiation order.
    #[default]
    Counter,
    /// Eight random hex digits, e.g. `Traitc3f09a21`.
    Random,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstantiatorConfig {
    pub anonymous_naming: AnonymousNaming,
    /// Emit a notification for typed subjects no handler recognizes.
    pub report_unrecognized_types: bool,
    /// Namespace for synthesized URNs when a document has none of its own.
    pub fallback_namespace: String,
}

impl Default for InstantiatorConfig {
    fn default() -> Self {
        Self {
            anonymous_naming: AnonymousNaming::Counter,
            report_unrecognized_types: true,
            fallback_namespace: "urn:samm:anonymous.elements:0.0.0#".to_string(),
        }
    }
}

impl InstantiatorConfig {
    pub fn from_json_str(text: &str) -> Result<Self, InstantiateError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, InstantiateError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
