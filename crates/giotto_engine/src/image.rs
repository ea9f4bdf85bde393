//! Image generation executor.

use crate::{
    AssetExecutor, ExecutionContext, ExecutorValidation, GeneratedMedia, ImageRequest,
};
use giotto_core::{Action, AssetKind, AssetResult, CostEstimate, ImageModel};
use giotto_error::{ExecutorError, ExecutorErrorKind};
use giotto_rate_limit::ResourceClass;
use giotto_storage::{AssetMetadata, MediaType};
use serde_json::json;
use std::collections::HashMap;

const MAX_PROMPT_CHARS: usize = 2000;

/// Prompt content that is rejected outright.
const DENY_LIST: &[&str] = &["nsfw", "gore", "explicit", "hateful"];

/// Appended to every prompt unless already present.
const STYLE_MODIFIERS: &[&str] = &["cinematic lighting", "high detail", "game art style"];

/// Executor for `asset_image` actions.
///
/// Validates the prompt, enhances it with a fixed set of style modifiers,
/// and prices by model: `flux-schnell` is the free tier, `flux-dev` is a
/// flat per-image price.
#[derive(Debug, Clone, Default)]
pub struct ImageExecutor;

impl ImageExecutor {
    /// Create an image executor.
    pub fn new() -> Self {
        Self
    }

    /// Flat per-image price for a model.
    fn price(model: ImageModel) -> f64 {
        match model {
            ImageModel::FluxSchnell => 0.0,
            ImageModel::FluxDev => 0.025,
        }
    }

    /// Append style modifiers the prompt doesn't already carry. The
    /// presence check is case-insensitive so prompts are never doubled up.
    fn enhance_prompt(prompt: &str) -> String {
        let mut enhanced = prompt.trim().to_string();
        let lowered = enhanced.to_lowercase();
        for modifier in STYLE_MODIFIERS {
            if !lowered.contains(modifier) {
                enhanced.push_str(", ");
                enhanced.push_str(modifier);
            }
        }
        enhanced
    }
}

#[async_trait::async_trait]
impl AssetExecutor for ImageExecutor {
    fn kind(&self) -> AssetKind {
        AssetKind::Image
    }

    fn action_type(&self) -> &'static str {
        "asset_image"
    }

    fn resource_class(&self) -> Option<ResourceClass> {
        Some(ResourceClass::ImageGeneration)
    }

    fn validate(&self, action: &Action) -> ExecutorValidation {
        let Action::AssetImage { prompt, .. } = action else {
            return ExecutorValidation::failed(vec!["expected an asset_image action".to_string()]);
        };

        let mut errors = Vec::new();
        if prompt.trim().is_empty() {
            errors.push("prompt must not be empty".to_string());
        }
        if prompt.chars().count() > MAX_PROMPT_CHARS {
            errors.push(format!("prompt exceeds {} characters", MAX_PROMPT_CHARS));
        }
        let lowered = prompt.to_lowercase();
        for term in DENY_LIST {
            if lowered.contains(term) {
                errors.push(format!("prompt contains disallowed term '{}'", term));
            }
        }

        if errors.is_empty() {
            ExecutorValidation::ok()
        } else {
            ExecutorValidation::failed(errors)
        }
    }

    fn estimate_cost(&self, action: &Action) -> CostEstimate {
        let Action::AssetImage { model, .. } = action else {
            return CostEstimate::free();
        };
        let price = Self::price(*model);
        CostEstimate::new(price, price, "USD".to_string())
    }

    fn billing(&self, action: &Action) -> (String, f64) {
        match action {
            Action::AssetImage { model, .. } => (model.to_string(), 1.0),
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
        let Action::AssetImage {
            prompt,
            size,
            model,
            ..
        } = action
        else {
            return Err(ExecutorError::new(ExecutorErrorKind::Validation(
                "expected an asset_image action".to_string(),
            )));
        };

        let enhanced = Self::enhance_prompt(prompt);
        let request = ImageRequest {
            prompt: enhanced.clone(),
            size: *size,
            model: *model,
            api_key: ctx.credentials().image_api_key.clone(),
        };

        let GeneratedMedia {
            data, mime_type, ..
        } = ctx.generator().generate_image(&request).await?;

        let stored = ctx
            .storage()
            .store(
                &data,
                &AssetMetadata {
                    asset_id: id.to_string(),
                    media_type: MediaType::Image,
                    mime_type,
                    duration_seconds: None,
                },
            )
            .await
            .map_err(|e| ExecutorError::new(ExecutorErrorKind::Generation(e.to_string())))?;

        let (width, height) = size.dimensions();
        let mut metadata = HashMap::new();
        metadata.insert("model".to_string(), json!(model.to_string()));
        metadata.insert("size".to_string(), json!(size.to_string()));
        metadata.insert("prompt".to_string(), json!(enhanced));
        metadata.insert("width".to_string(), json!(width));
        metadata.insert("height".to_string(), json!(height));

        tracing::info!(id, model = %model, "Generated image asset");
        Ok(AssetResult {
            id: id.to_string(),
            url: stored.url,
            kind: AssetKind::Image,
            metadata,
            cost: Self::price(*model),
            duration_seconds: None,
        })
    }
}
