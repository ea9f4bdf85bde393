//! Cutscene assembly executor.

use crate::{AssetExecutor, ExecutionContext, ExecutorValidation};
use giotto_core::{Action, AssetKind, AssetResult, CostEstimate, Shot};
use giotto_error::{ExecutorError, ExecutorErrorKind, GiottoError};
use giotto_rate_limit::ResourceClass;
use giotto_storage::{AssetMetadata, MediaType};
use serde_json::json;
use std::collections::BTreeSet;
use std::collections::HashMap;

const MIN_SHOT_SECONDS: f64 = 1.0;
const MAX_SHOT_SECONDS: f64 = 30.0;
const PACING_RATIO: f64 = 10.0;

/// Executor for `asset_cutscene` actions.
///
/// Pure assembly: no external generation call. Verifies every shot's
/// referenced image and subtitle asset already exists in storage (all
/// missing references are reported at once), computes total duration, and
/// emits non-fatal pacing warnings. Cost is always zero; the cost lives in
/// the referenced assets.
#[derive(Debug, Clone, Default)]
pub struct CutsceneExecutor;

impl CutsceneExecutor {
    /// Create a cutscene assembly executor.
    pub fn new() -> Self {
        Self
    }

    /// Non-fatal pacing findings for a shot list.
    fn pacing_warnings(shots: &[Shot], audio_durations: &[Option<f64>]) -> Vec<String> {
        let mut warnings = Vec::new();

        for (index, shot) in shots.iter().enumerate() {
            if shot.duration < MIN_SHOT_SECONDS {
                warnings.push(format!(
                    "shot {} runs {:.1}s, shorter than {:.0}s",
                    index, shot.duration, MIN_SHOT_SECONDS
                ));
            }
            if shot.duration > MAX_SHOT_SECONDS {
                warnings.push(format!(
                    "shot {} runs {:.1}s, longer than {:.0}s",
                    index, shot.duration, MAX_SHOT_SECONDS
                ));
            }
            if let Some(audio) = audio_durations[index]
                && audio > shot.duration
            {
                warnings.push(format!(
                    "shot {} audio runs {:.1}s, longer than its {:.1}s shot",
                    index, audio, shot.duration
                ));
            }
        }

        if shots.len() >= 2 {
            let longest = shots.iter().map(|s| s.duration).fold(f64::MIN, f64::max);
            let shortest = shots.iter().map(|s| s.duration).fold(f64::MAX, f64::min);
            if shortest > 0.0 && longest / shortest > PACING_RATIO {
                warnings.push(format!(
                    "uneven pacing: longest shot ({:.1}s) is over {:.0}x the shortest ({:.1}s)",
                    longest, PACING_RATIO, shortest
                ));
            }
        }

        warnings
    }
}

fn storage_error(e: GiottoError) -> ExecutorError {
    ExecutorError::new(ExecutorErrorKind::Generation(e.to_string()))
}

#[async_trait::async_trait]
impl AssetExecutor for CutsceneExecutor {
    fn kind(&self) -> AssetKind {
        AssetKind::Cutscene
    }

    fn action_type(&self) -> &'static str {
        "asset_cutscene"
    }

    fn resource_class(&self) -> Option<ResourceClass> {
        None
    }

    fn validate(&self, action: &Action) -> ExecutorValidation {
        let Action::AssetCutscene { shots, .. } = action else {
            return ExecutorValidation::failed(vec![
                "expected an asset_cutscene action".to_string(),
            ]);
        };

        let mut errors = Vec::new();
        if shots.is_empty() {
            errors.push("cutscene must have at least one shot".to_string());
        }
        for (index, shot) in shots.iter().enumerate() {
            if shot.duration <= 0.0 {
                errors.push(format!("shot {} duration must be positive", index));
            }
        }

        if errors.is_empty() {
            ExecutorValidation::ok()
        } else {
            ExecutorValidation::failed(errors)
        }
    }

    fn estimate_cost(&self, _action: &Action) -> CostEstimate {
        CostEstimate::free()
    }

    fn billing(&self, action: &Action) -> (String, f64) {
        match action {
            Action::AssetCutscene { shots, .. } => ("assembly".to_string(), shots.len() as f64),
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
        let Action::AssetCutscene { shots, .. } = action else {
            return Err(ExecutorError::new(ExecutorErrorKind::Validation(
                "expected an asset_cutscene action".to_string(),
            )));
        };

        // All missing references are reported together, not just the first.
        let mut missing = BTreeSet::new();
        for shot in shots {
            for referent in [&shot.image_id, &shot.subtitle_id] {
                if !ctx
                    .storage()
                    .exists(referent)
                    .await
                    .map_err(storage_error)?
                {
                    missing.insert(referent.clone());
                }
            }
        }
        if !missing.is_empty() {
            let listed = missing.into_iter().collect::<Vec<_>>().join(", ");
            return Err(ExecutorError::new(ExecutorErrorKind::MissingAssets(listed)));
        }

        let mut audio_durations = Vec::with_capacity(shots.len());
        let mut shot_entries = Vec::with_capacity(shots.len());
        for shot in shots {
            let image_url = ctx
                .storage()
                .url(&shot.image_id)
                .await
                .map_err(storage_error)?;
            let subtitle_url = ctx
                .storage()
                .url(&shot.subtitle_id)
                .await
                .map_err(storage_error)?;
            let audio = ctx
                .storage()
                .duration(&shot.subtitle_id)
                .await
                .map_err(storage_error)?;
            audio_durations.push(audio);
            shot_entries.push(json!({
                "image_id": shot.image_id,
                "image_url": image_url,
                "subtitle_id": shot.subtitle_id,
                "subtitle_url": subtitle_url,
                "audio_duration": audio,
                "duration": shot.duration,
                "animation": shot.animation,
            }));
        }

        let total_duration: f64 = shots.iter().map(|s| s.duration).sum();
        let warnings = Self::pacing_warnings(shots, &audio_durations);
        for warning in &warnings {
            tracing::warn!(id, warning = %warning, "Cutscene pacing");
        }

        let definition = json!({
            "id": id,
            "total_duration": total_duration,
            "shots": shot_entries,
        });

        let stored = ctx
            .storage()
            .store_json(
                &definition,
                &AssetMetadata {
                    asset_id: id.to_string(),
                    media_type: MediaType::Definition,
                    mime_type: "application/json".to_string(),
                    duration_seconds: Some(total_duration),
                },
            )
            .await
            .map_err(storage_error)?;

        let mut metadata = HashMap::new();
        metadata.insert("shot_count".to_string(), json!(shots.len()));
        metadata.insert("total_duration".to_string(), json!(total_duration));
        metadata.insert("warnings".to_string(), json!(warnings));
        metadata.insert("definition".to_string(), definition);

        tracing::info!(id, shots = shots.len(), total_duration, "Assembled cutscene");
        Ok(AssetResult {
            id: id.to_string(),
            url: stored.url,
            kind: AssetKind::Cutscene,
            metadata,
            cost: 0.0,
            duration_seconds: Some(total_duration),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use giotto_core::ShotAnimation;

    fn shot(duration: f64) -> Shot {
        Shot {
            image_id: "img".to_string(),
            subtitle_id: "sub".to_string(),
            duration,
            animation: ShotAnimation::None,
        }
    }

    #[test]
    fn short_and_long_shots_are_flagged() {
        let shots = [shot(0.5), shot(40.0)];
        let warnings = CutsceneExecutor::pacing_warnings(&shots, &[None, None]);
        assert_eq!(warnings.len(), 3); // short, long, uneven
        assert!(warnings[0].contains("shorter"));
        assert!(warnings[1].contains("longer"));
        assert!(warnings[2].contains("uneven pacing"));
    }

    #[test]
    fn audio_overrun_is_flagged() {
        let shots = [shot(3.0)];
        let warnings = CutsceneExecutor::pacing_warnings(&shots, &[Some(4.5)]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("audio"));
    }

    #[test]
    fn even_pacing_produces_no_warnings() {
        let shots = [shot(4.0), shot(5.0), shot(6.0)];
        let warnings = CutsceneExecutor::pacing_warnings(&shots, &[None, None, None]);
        assert!(warnings.is_empty());
    }
}
