//! Simulated generation backend.
//!
//! Produces deterministic bytes seeded by the request content, with a
//! small cooperative delay standing in for network latency. No real
//! provider is contacted.

use crate::{GeneratedMedia, ImageRequest, MediaGenerator, SpeechRequest};
use giotto_core::VoicePace;
use giotto_error::GeneratorError;
use sha2::{Digest, Sha256};
use std::time::Duration;

/// Deterministic, provider-free generation backend.
///
/// Image bytes are a PNG-tagged digest expansion of the request; speech
/// bytes are an MP3-tagged expansion with a duration estimated from the
/// word count at the requested speed.
///
/// # Example
///
/// ```
/// use giotto_engine::SimulatedGenerator;
///
/// let generator = SimulatedGenerator::new().with_latency(std::time::Duration::ZERO);
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedGenerator {
    latency: Duration,
}

impl SimulatedGenerator {
    /// Create a generator with a small default latency.
    pub fn new() -> Self {
        Self {
            latency: Duration::from_millis(5),
        }
    }

    /// Override the simulated network latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Expand a seed string into `len` deterministic bytes.
    fn expand(seed: &str, len: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(len);
        let mut counter: u64 = 0;
        while out.len() < len {
            let mut hasher = Sha256::new();
            hasher.update(seed.as_bytes());
            hasher.update(counter.to_le_bytes());
            out.extend_from_slice(&hasher.finalize());
            counter += 1;
        }
        out.truncate(len);
        out
    }
}

impl Default for SimulatedGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MediaGenerator for SimulatedGenerator {
    #[tracing::instrument(skip(self, request), fields(model = %request.model, size = %request.size))]
    async fn generate_image(
        &self,
        request: &ImageRequest,
    ) -> Result<GeneratedMedia, GeneratorError> {
        tokio::time::sleep(self.latency).await;

        let (width, height) = request.size.dimensions();
        let seed = format!("image:{}:{}:{}", request.model, request.size, request.prompt);
        // A digest expansion scaled well below a real PNG keeps tests fast.
        let len = (width as usize * height as usize) / 1024;
        let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
        data.extend(Self::expand(&seed, len.max(64)));

        tracing::debug!(bytes = data.len(), "Simulated image generation");
        Ok(GeneratedMedia {
            data,
            mime_type: "image/png".to_string(),
            duration_seconds: None,
        })
    }

    #[tracing::instrument(skip(self, request), fields(model = %request.model, voice = %request.voice))]
    async fn synthesize_speech(
        &self,
        request: &SpeechRequest,
    ) -> Result<GeneratedMedia, GeneratorError> {
        tokio::time::sleep(self.latency).await;

        let words = request.text.split_whitespace().count() as f64;
        let wpm = VoicePace::Normal.words_per_minute() * request.speed;
        let duration = (words / wpm * 60.0).max(1.0);

        let seed = format!(
            "speech:{}:{}:{}:{}",
            request.model, request.voice, request.speed, request.text
        );
        let mut data = b"ID3".to_vec();
        data.extend(Self::expand(&seed, (duration * 128.0) as usize));

        tracing::debug!(bytes = data.len(), duration, "Simulated speech synthesis");
        Ok(GeneratedMedia {
            data,
            mime_type: "audio/mpeg".to_string(),
            duration_seconds: Some(duration),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use giotto_core::{ImageModel, ImageSize, SpeechModel};

    #[tokio::test]
    async fn identical_requests_produce_identical_bytes() {
        let generator = SimulatedGenerator::new().with_latency(Duration::ZERO);
        let request = ImageRequest {
            prompt: "ruins".to_string(),
            size: ImageSize::Square,
            model: ImageModel::FluxSchnell,
            api_key: None,
        };
        let first = generator.generate_image(&request).await.unwrap();
        let second = generator.generate_image(&request).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn speech_duration_has_a_floor() {
        let generator = SimulatedGenerator::new().with_latency(Duration::ZERO);
        let request = SpeechRequest {
            text: "hi".to_string(),
            voice: "alloy".to_string(),
            speed: 1.0,
            pitch: 0.0,
            model: SpeechModel::OpenaiTts,
            api_key: None,
        };
        let media = generator.synthesize_speech(&request).await.unwrap();
        assert_eq!(media.duration_seconds, Some(1.0));
    }
}
