//! Speech synthesis executor.

use crate::{AssetExecutor, ExecutionContext, ExecutorValidation, SpeechRequest};
use giotto_core::{
    Action, AssetKind, AssetResult, CostEstimate, SpeechModel, VoiceGender, VoicePace, VoiceTone,
};
use giotto_error::{ExecutorError, ExecutorErrorKind};
use giotto_rate_limit::ResourceClass;
use giotto_storage::{AssetMetadata, MediaType};
use serde_json::json;
use std::collections::HashMap;

const MAX_TEXT_CHARS: usize = 4000;

/// Executor for `asset_subtitle` actions.
///
/// Maps the abstract voice parameters (gender, tone, pace) onto a concrete
/// voice identifier and speed/pitch adjustments per model, prices per
/// character, and estimates spoken duration from the word count.
#[derive(Debug, Clone, Default)]
pub struct SpeechExecutor;

impl SpeechExecutor {
    /// Create a speech executor.
    pub fn new() -> Self {
        Self
    }

    /// Per-character price for a model.
    fn price_per_char(model: SpeechModel) -> f64 {
        match model {
            SpeechModel::OpenaiTts => 0.000_015,
            SpeechModel::ElevenLabs => 0.000_03,
        }
    }

    /// Concrete voice identifier for a (gender, tone) pair, per model.
    fn voice_id(model: SpeechModel, gender: VoiceGender, tone: VoiceTone) -> &'static str {
        match model {
            SpeechModel::OpenaiTts => match (gender, tone) {
                (VoiceGender::Male, VoiceTone::Epic) => "onyx",
                (VoiceGender::Male, VoiceTone::Calm) => "echo",
                (VoiceGender::Male, VoiceTone::Urgent) => "onyx",
                (VoiceGender::Male, VoiceTone::Somber) => "echo",
                (VoiceGender::Male, VoiceTone::Playful) => "fable",
                (VoiceGender::Female, VoiceTone::Epic) => "nova",
                (VoiceGender::Female, VoiceTone::Calm) => "shimmer",
                (VoiceGender::Female, VoiceTone::Urgent) => "nova",
                (VoiceGender::Female, VoiceTone::Somber) => "shimmer",
                (VoiceGender::Female, VoiceTone::Playful) => "nova",
                (VoiceGender::Neutral, VoiceTone::Playful) => "fable",
                (VoiceGender::Neutral, _) => "alloy",
            },
            SpeechModel::ElevenLabs => match (gender, tone) {
                (VoiceGender::Male, VoiceTone::Epic) => "Adam",
                (VoiceGender::Male, VoiceTone::Calm) => "Antoni",
                (VoiceGender::Male, VoiceTone::Urgent) => "Josh",
                (VoiceGender::Male, VoiceTone::Somber) => "Arnold",
                (VoiceGender::Male, VoiceTone::Playful) => "Sam",
                (VoiceGender::Female, VoiceTone::Epic) => "Domi",
                (VoiceGender::Female, VoiceTone::Calm) => "Rachel",
                (VoiceGender::Female, VoiceTone::Urgent) => "Elli",
                (VoiceGender::Female, VoiceTone::Somber) => "Rachel",
                (VoiceGender::Female, VoiceTone::Playful) => "Bella",
                (VoiceGender::Neutral, _) => "Sam",
            },
        }
    }

    /// Playback speed multiplier for a pace.
    fn speed_for(pace: VoicePace) -> f64 {
        match pace {
            VoicePace::Slow => 0.85,
            VoicePace::Normal => 1.0,
            VoicePace::Fast => 1.15,
        }
    }

    /// Pitch adjustment in semitones for a tone.
    fn pitch_for(tone: VoiceTone) -> f64 {
        match tone {
            VoiceTone::Epic => -2.0,
            VoiceTone::Calm => 0.0,
            VoiceTone::Urgent => 1.5,
            VoiceTone::Somber => -3.0,
            VoiceTone::Playful => 2.0,
        }
    }

    /// Spoken duration estimated from word count at a pace-dependent
    /// words-per-minute rate, minimum 1 second.
    fn estimate_duration(text: &str, pace: VoicePace) -> f64 {
        let words = text.split_whitespace().count() as f64;
        (words / pace.words_per_minute() * 60.0).max(1.0)
    }
}

#[async_trait::async_trait]
impl AssetExecutor for SpeechExecutor {
    fn kind(&self) -> AssetKind {
        AssetKind::Subtitle
    }

    fn action_type(&self) -> &'static str {
        "asset_subtitle"
    }

    fn resource_class(&self) -> Option<ResourceClass> {
        Some(ResourceClass::TtsGeneration)
    }

    fn validate(&self, action: &Action) -> ExecutorValidation {
        let Action::AssetSubtitle { text, .. } = action else {
            return ExecutorValidation::failed(vec![
                "expected an asset_subtitle action".to_string(),
            ]);
        };

        let mut errors = Vec::new();
        let chars = text.chars().count();
        if chars == 0 {
            errors.push("text must not be empty".to_string());
        }
        if chars > MAX_TEXT_CHARS {
            errors.push(format!("text exceeds {} characters", MAX_TEXT_CHARS));
        }

        if errors.is_empty() {
            ExecutorValidation::ok()
        } else {
            ExecutorValidation::failed(errors)
        }
    }

    fn estimate_cost(&self, action: &Action) -> CostEstimate {
        let Action::AssetSubtitle { text, model, .. } = action else {
            return CostEstimate::free();
        };
        let cost = text.chars().count() as f64 * Self::price_per_char(*model);
        CostEstimate::new(cost, cost, "USD".to_string())
    }

    fn billing(&self, action: &Action) -> (String, f64) {
        match action {
            Action::AssetSubtitle { text, model, .. } => {
                (model.to_string(), text.chars().count() as f64)
            }
            _ => ("unknown".to_string(), 0.0),
        }
    }

    #[tracing::instrument(skip(self, action, ctx))]
    async fn invoke(
        &self,
        id: &str,
        action: &Action,
        ctx: &ExecutionContext,
    ) -> Result<AssetResult, ExecutorError> {
        let Action::AssetSubtitle {
            text,
            voice_gender,
            voice_tone,
            voice_pace,
            model,
            ..
        } = action
        else {
            return Err(ExecutorError::new(ExecutorErrorKind::Validation(
                "expected an asset_subtitle action".to_string(),
            )));
        };

        let voice = Self::voice_id(*model, *voice_gender, *voice_tone);
        let speed = Self::speed_for(*voice_pace);
        let pitch = Self::pitch_for(*voice_tone);
        let duration = Self::estimate_duration(text, *voice_pace);

        let request = SpeechRequest {
            text: text.clone(),
            voice: voice.to_string(),
            speed,
            pitch,
            model: *model,
            api_key: ctx.credentials().tts_api_key.clone(),
        };

        let media = ctx.generator().synthesize_speech(&request).await?;

        let stored = ctx
            .storage()
            .store(
                &media.data,
                &AssetMetadata {
                    asset_id: id.to_string(),
                    media_type: MediaType::Audio,
                    mime_type: media.mime_type,
                    duration_seconds: Some(duration),
                },
            )
            .await
            .map_err(|e| ExecutorError::new(ExecutorErrorKind::Generation(e.to_string())))?;

        let chars = text.chars().count();
        let mut metadata = HashMap::new();
        metadata.insert("model".to_string(), json!(model.to_string()));
        metadata.insert("voice".to_string(), json!(voice));
        metadata.insert("speed".to_string(), json!(speed));
        metadata.insert("pitch".to_string(), json!(pitch));
        metadata.insert("characters".to_string(), json!(chars));

        tracing::info!(id, model = %model, voice, duration, "Synthesized narration asset");
        Ok(AssetResult {
            id: id.to_string(),
            url: stored.url,
            kind: AssetKind::Subtitle,
            metadata,
            cost: chars as f64 * Self::price_per_char(*model),
            duration_seconds: Some(duration),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_lookup_is_model_specific() {
        assert_eq!(
            SpeechExecutor::voice_id(SpeechModel::OpenaiTts, VoiceGender::Male, VoiceTone::Epic),
            "onyx"
        );
        assert_eq!(
            SpeechExecutor::voice_id(SpeechModel::ElevenLabs, VoiceGender::Male, VoiceTone::Epic),
            "Adam"
        );
        assert_eq!(
            SpeechExecutor::voice_id(
                SpeechModel::OpenaiTts,
                VoiceGender::Neutral,
                VoiceTone::Epic
            ),
            "alloy"
        );
    }

    #[test]
    fn duration_estimate_depends_on_pace() {
        let text = "one two three four five six seven eight nine ten";
        let slow = SpeechExecutor::estimate_duration(text, VoicePace::Slow);
        let fast = SpeechExecutor::estimate_duration(text, VoicePace::Fast);
        assert!(slow > fast);
        assert!((slow - 5.0).abs() < 1e-9); // 10 words at 120 wpm
    }

    #[test]
    fn duration_estimate_has_a_floor() {
        assert_eq!(
            SpeechExecutor::estimate_duration("hi", VoicePace::Fast),
            1.0
        );
    }

    #[test]
    fn text_length_bounds_are_enforced() {
        let executor = SpeechExecutor::new();
        let long_text = "x".repeat(4001);
        let action: Action = serde_json::from_value(serde_json::json!({
            "type": "asset_subtitle",
            "text": long_text,
            "voice_gender": "neutral",
            "voice_tone": "calm",
            "voice_pace": "normal",
            "model": "openai-tts"
        }))
        .unwrap();
        let validation = executor.validate(&action);
        assert!(!validation.valid);
        assert!(validation.errors[0].contains("4000"));
    }
}
