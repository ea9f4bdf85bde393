//! Metered resource classes.

use serde::{Deserialize, Serialize};

/// A class of metered external resource.
///
/// Each class has independent admission limits; executors name the class
/// they draw on when acquiring a slot.
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
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResourceClass {
    /// Image generation requests
    ImageGeneration,
    /// Text-to-speech synthesis requests
    TtsGeneration,
}
