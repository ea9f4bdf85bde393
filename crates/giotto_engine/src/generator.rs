//! Generation backend abstraction.

use giotto_core::{ImageModel, ImageSize, SpeechModel};
use giotto_error::GeneratorError;

/// A request to generate one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    /// Prompt, already enhanced with style modifiers
    pub prompt: String,
    /// Output resolution
    pub size: ImageSize,
    /// Generation model
    pub model: ImageModel,
    /// API key for the backend, when it requires one
    pub api_key: Option<String>,
}

/// A request to synthesize one narration clip.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    /// Text to speak
    pub text: String,
    /// Concrete voice identifier for the model
    pub voice: String,
    /// Playback speed multiplier
    pub speed: f64,
    /// Pitch adjustment in semitones
    pub pitch: f64,
    /// Synthesis model
    pub model: SpeechModel,
    /// API key for the backend, when it requires one
    pub api_key: Option<String>,
}

/// Raw output of a generation backend.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMedia {
    /// Generated bytes
    pub data: Vec<u8>,
    /// MIME type of the bytes
    pub mime_type: String,
    /// Audio duration in seconds, when the media carries sound
    pub duration_seconds: Option<f64>,
}

/// Trait for pluggable generation backends.
///
/// The executor layer drives this behind validation, caching, rate
/// limiting, and retry; implementations only produce media. Errors carry
/// their own retry classification via
/// [`giotto_error::GeneratorErrorKind::is_retryable`].
#[async_trait::async_trait]
pub trait MediaGenerator: Send + Sync {
    /// Generate one image.
    async fn generate_image(&self, request: &ImageRequest)
    -> Result<GeneratedMedia, GeneratorError>;

    /// Synthesize one narration clip.
    async fn synthesize_speech(
        &self,
        request: &SpeechRequest,
    ) -> Result<GeneratedMedia, GeneratorError>;
}
