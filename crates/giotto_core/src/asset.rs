//! Generated asset records.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// The kind of artifact an asset action produces.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AssetKind {
    /// Generated image
    Image,
    /// Synthesized narration audio
    Subtitle,
    /// Assembled cutscene definition
    Cutscene,
}

/// Result of executing one asset action.
///
/// Created by an executor, optionally cached, and consumed by the cutscene
/// assembler or the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetResult {
    /// Identifier of the producing action
    pub id: String,
    /// Location of the stored artifact
    pub url: String,
    /// Artifact kind
    pub kind: AssetKind,
    /// Kind-specific metadata (model, prompt, voice, shot count, ...)
    #[serde(default)]
    pub metadata: HashMap<String, JsonValue>,
    /// Monetary cost of producing the artifact, in USD
    pub cost: f64,
    /// Audio duration in seconds, when the artifact carries sound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
}

/// Cost range an executor predicts for an action before running it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_new::new)]
pub struct CostEstimate {
    /// Lower bound in `currency`
    pub min: f64,
    /// Upper bound in `currency`
    pub max: f64,
    /// ISO currency code
    pub currency: String,
}

impl CostEstimate {
    /// A zero-cost estimate in USD.
    pub fn free() -> Self {
        Self::new(0.0, 0.0, "USD".to_string())
    }
}
