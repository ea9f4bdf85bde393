//! Batch execution results and game-action markers.

use giotto_core::{Action, AssetResult, ChoiceOption};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Typed marker the engine emits for a game action instead of executing
/// it. Game semantics need live world state and player input, which live
/// outside this pipeline; the downstream interpreter consumes these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "directive", rename_all = "snake_case")]
pub enum GameDirective {
    /// Play an assembled cutscene
    PlayCutscene {
        /// Cutscene asset to play
        cutscene_id: String,
    },
    /// Show a modal dialog
    ShowModal {
        /// Optional dialog title
        title: Option<String>,
        /// Dialog body text
        text: String,
        /// Optional image asset
        image_id: Option<String>,
        /// Optional narration asset
        subtitle_id: Option<String>,
    },
    /// Grant a feature at a world-state path
    AddFeature {
        /// Dot-separated world-state path
        target: String,
        /// Optional value stored at the path
        value: Option<JsonValue>,
    },
    /// Remove a feature at a world-state path
    RemoveFeature {
        /// Dot-separated world-state path
        target: String,
    },
    /// Arm a conditional action
    WhenThen {
        /// Dot-separated condition path
        condition: String,
        /// Action to run when the condition holds
        then: Box<Action>,
    },
    /// Offer the player a choice
    AddPlayerChoice {
        /// Prompt shown to the player
        prompt: String,
        /// Selectable options
        options: Vec<ChoiceOption>,
    },
}

impl GameDirective {
    /// Build the marker for a game action. Returns `None` for asset actions
    /// and `reason` annotations.
    pub fn from_action(action: &Action) -> Option<Self> {
        match action {
            Action::PlayCutscene { cutscene_id, .. } => Some(GameDirective::PlayCutscene {
                cutscene_id: cutscene_id.clone(),
            }),
            Action::ShowModal {
                title,
                text,
                image_id,
                subtitle_id,
                ..
            } => Some(GameDirective::ShowModal {
                title: title.clone(),
                text: text.clone(),
                image_id: image_id.clone(),
                subtitle_id: subtitle_id.clone(),
            }),
            Action::AddFeature { target, value, .. } => Some(GameDirective::AddFeature {
                target: target.clone(),
                value: value.clone(),
            }),
            Action::RemoveFeature { target, .. } => Some(GameDirective::RemoveFeature {
                target: target.clone(),
            }),
            Action::WhenThen {
                condition, then, ..
            } => Some(GameDirective::WhenThen {
                condition: condition.clone(),
                then: then.clone(),
            }),
            Action::AddPlayerChoice {
                prompt, options, ..
            } => Some(GameDirective::AddPlayerChoice {
                prompt: prompt.clone(),
                options: options.clone(),
            }),
            Action::Reason { .. }
            | Action::AssetImage { .. }
            | Action::AssetSubtitle { .. }
            | Action::AssetCutscene { .. } => None,
        }
    }
}

/// What executing one node produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// A generated artifact; cutscenes additionally carry their assembled
    /// definition object
    Asset {
        /// Result record for the artifact
        result: AssetResult,
        /// Assembled cutscene definition, for cutscene results
        #[serde(default, skip_serializing_if = "Option::is_none")]
        definition: Option<JsonValue>,
    },
    /// A marker for the downstream world-state interpreter
    Game {
        /// The typed marker
        directive: GameDirective,
    },
    /// An annotation with no effect
    Annotation,
}

/// One executed node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutedAction {
    /// Node identifier
    pub id: String,
    /// Wire tag of the action
    pub action_type: String,
    /// What execution produced
    pub outcome: ActionOutcome,
}

/// One failed node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionError {
    /// Node identifier
    pub action_id: String,
    /// Wire tag of the action
    pub action_type: String,
    /// What went wrong
    pub message: String,
}

/// Result of executing one batch.
///
/// A failed batch still carries every asset that did generate, so a caller
/// can proceed with partial results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Whether every node executed cleanly
    pub success: bool,
    /// Results of the asset actions that generated
    pub assets_generated: Vec<AssetResult>,
    /// Every node that executed, in execution order
    pub actions_executed: Vec<ExecutedAction>,
    /// One entry per failed node
    pub errors: Vec<ExecutionError>,
    /// Sum of all recorded charges in USD
    pub total_cost: f64,
    /// Per `kind/model` cost totals
    pub cost_breakdown: HashMap<String, f64>,
    /// Wall-clock batch duration in milliseconds
    pub execution_time_ms: u64,
}
