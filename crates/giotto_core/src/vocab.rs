//! String-formed vocabulary enums for the action DSL.
//!
//! Each concept has exactly one enumeration, shared by the script compiler
//! and the executors. The serde spellings are the wire format an action
//! script is written in; the strum spellings match so that `Display` and
//! `FromStr` round-trip with the wire format.

use serde::{Deserialize, Serialize};

/// Output resolution for generated images.
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
pub enum ImageSize {
    /// 1024x1024 square
    #[serde(rename = "1024x1024")]
    #[strum(serialize = "1024x1024")]
    Square,
    /// 1024x768 landscape
    #[serde(rename = "1024x768")]
    #[strum(serialize = "1024x768")]
    Landscape,
    /// 768x1024 portrait
    #[serde(rename = "768x1024")]
    #[strum(serialize = "768x1024")]
    Portrait,
    /// 1920x1080 widescreen
    #[serde(rename = "1920x1080")]
    #[strum(serialize = "1920x1080")]
    Widescreen,
}

impl ImageSize {
    /// Pixel dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            ImageSize::Square => (1024, 1024),
            ImageSize::Landscape => (1024, 768),
            ImageSize::Portrait => (768, 1024),
            ImageSize::Widescreen => (1920, 1080),
        }
    }
}

/// Image generation model.
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
pub enum ImageModel {
    /// Fast free-tier model
    #[serde(rename = "flux-schnell")]
    #[strum(serialize = "flux-schnell")]
    FluxSchnell,
    /// Higher-quality paid model
    #[serde(rename = "flux-dev")]
    #[strum(serialize = "flux-dev")]
    FluxDev,
}

/// Speech synthesis model.
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
pub enum SpeechModel {
    /// OpenAI text-to-speech
    #[serde(rename = "openai-tts")]
    #[strum(serialize = "openai-tts")]
    OpenaiTts,
    /// ElevenLabs voice synthesis
    #[serde(rename = "elevenlabs")]
    #[strum(serialize = "elevenlabs")]
    ElevenLabs,
}

/// Narrator voice gender.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VoiceGender {
    /// Male voice
    Male,
    /// Female voice
    Female,
    /// Gender-neutral voice
    Neutral,
}

/// Narrator voice tone.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VoiceTone {
    /// Grand, sweeping delivery
    Epic,
    /// Even, soothing delivery
    Calm,
    /// Pressed, driving delivery
    Urgent,
    /// Heavy, mournful delivery
    Somber,
    /// Light, amused delivery
    Playful,
}

/// Narrator speaking pace.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VoicePace {
    /// Slow narration
    Slow,
    /// Default narration speed
    Normal,
    /// Fast narration
    Fast,
}

impl VoicePace {
    /// Approximate spoken words per minute at this pace.
    pub fn words_per_minute(&self) -> f64 {
        match self {
            VoicePace::Slow => 120.0,
            VoicePace::Normal => 150.0,
            VoicePace::Fast => 180.0,
        }
    }
}

/// Camera treatment applied to a cutscene shot.
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
pub enum ShotAnimation {
    /// Static shot
    None,
    /// Pan camera left
    PanLeft,
    /// Pan camera right
    PanRight,
    /// Slow zoom in
    ZoomIn,
    /// Slow zoom out
    ZoomOut,
    /// Crossfade from the previous shot
    Fade,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_size_round_trips_wire_spelling() {
        let size: ImageSize = serde_json::from_str("\"1024x768\"").unwrap();
        assert_eq!(size, ImageSize::Landscape);
        assert_eq!(size.to_string(), "1024x768");
        assert_eq!(serde_json::to_string(&size).unwrap(), "\"1024x768\"");
    }

    #[test]
    fn models_parse_from_str() {
        assert_eq!(
            "flux-schnell".parse::<ImageModel>().unwrap(),
            ImageModel::FluxSchnell
        );
        assert_eq!(
            "openai-tts".parse::<SpeechModel>().unwrap(),
            SpeechModel::OpenaiTts
        );
        assert!("dall-e".parse::<ImageModel>().is_err());
    }

    #[test]
    fn animation_uses_snake_case() {
        let anim: ShotAnimation = serde_json::from_str("\"pan_left\"").unwrap();
        assert_eq!(anim, ShotAnimation::PanLeft);
        assert_eq!(anim.to_string(), "pan_left");
    }
}
