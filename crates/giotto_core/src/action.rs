//! The action DSL sum type.
//!
//! An action script is a list of [`Action`] values, tagged by `type` on the
//! wire. Two variants are recursive: `when_then` nests a single action and
//! `add_player_choice` nests a reaction list per option, so traversal
//! helpers here are written as small recursive walks rather than flat field
//! scans.

use crate::{
    ImageModel, ImageSize, ShotAnimation, SpeechModel, VoiceGender, VoicePace, VoiceTone,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One step in an action script.
///
/// Asset variants (`asset_*`) produce generated artifacts when executed.
/// Game variants are passed through to the world-state interpreter as typed
/// markers. `reason` is an annotation and is never scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Free-text annotation explaining the script's intent. No-op.
    Reason {
        /// Optional identifier
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Annotation text
        text: String,
    },
    /// Generate an image asset.
    AssetImage {
        /// Optional identifier other actions may reference
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Generation prompt
        prompt: String,
        /// Output resolution
        size: ImageSize,
        /// Generation model
        model: ImageModel,
    },
    /// Synthesize narrated subtitle audio.
    AssetSubtitle {
        /// Optional identifier other actions may reference
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Text to speak
        text: String,
        /// Narrator gender
        voice_gender: VoiceGender,
        /// Narrator tone
        voice_tone: VoiceTone,
        /// Narrator pace
        voice_pace: VoicePace,
        /// Synthesis model
        model: SpeechModel,
    },
    /// Assemble a cutscene from previously generated assets.
    AssetCutscene {
        /// Optional identifier other actions may reference
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Ordered shot list
        shots: Vec<Shot>,
    },
    /// Direct the front end to play an assembled cutscene.
    PlayCutscene {
        /// Optional identifier
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Cutscene asset to play
        cutscene_id: String,
    },
    /// Direct the front end to show a modal dialog.
    ShowModal {
        /// Optional identifier
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Optional dialog title
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        /// Dialog body text
        text: String,
        /// Optional image asset shown in the dialog
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_id: Option<String>,
        /// Optional narration asset played with the dialog
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subtitle_id: Option<String>,
    },
    /// Grant a feature at a world-state path.
    AddFeature {
        /// Optional identifier
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Dot-separated world-state path
        target: String,
        /// Optional value stored at the path
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<JsonValue>,
    },
    /// Remove a feature at a world-state path.
    RemoveFeature {
        /// Optional identifier
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Dot-separated world-state path
        target: String,
    },
    /// Run a nested action when a world-state condition becomes true.
    WhenThen {
        /// Optional identifier
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Dot-separated condition path
        condition: String,
        /// Action to run when the condition holds
        then: Box<Action>,
    },
    /// Offer the player a choice with scripted reactions.
    AddPlayerChoice {
        /// Optional identifier
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Prompt shown to the player
        prompt: String,
        /// Selectable options
        options: Vec<ChoiceOption>,
    },
}

/// One shot of an assembled cutscene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    /// Image asset shown during the shot
    pub image_id: String,
    /// Narration asset played during the shot
    pub subtitle_id: String,
    /// Shot duration in seconds
    pub duration: f64,
    /// Camera treatment
    pub animation: ShotAnimation,
}

/// One selectable option of a player choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Option label shown to the player
    pub text: String,
    /// Actions run when the option is picked
    #[serde(default)]
    pub reactions: Vec<Action>,
}

impl Action {
    /// The declared identifier, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            Action::Reason { id, .. }
            | Action::AssetImage { id, .. }
            | Action::AssetSubtitle { id, .. }
            | Action::AssetCutscene { id, .. }
            | Action::PlayCutscene { id, .. }
            | Action::ShowModal { id, .. }
            | Action::AddFeature { id, .. }
            | Action::RemoveFeature { id, .. }
            | Action::WhenThen { id, .. }
            | Action::AddPlayerChoice { id, .. } => id.as_deref(),
        }
    }

    /// The wire tag of this action.
    pub fn action_type(&self) -> &'static str {
        match self {
            Action::Reason { .. } => "reason",
            Action::AssetImage { .. } => "asset_image",
            Action::AssetSubtitle { .. } => "asset_subtitle",
            Action::AssetCutscene { .. } => "asset_cutscene",
            Action::PlayCutscene { .. } => "play_cutscene",
            Action::ShowModal { .. } => "show_modal",
            Action::AddFeature { .. } => "add_feature",
            Action::RemoveFeature { .. } => "remove_feature",
            Action::WhenThen { .. } => "when_then",
            Action::AddPlayerChoice { .. } => "add_player_choice",
        }
    }

    /// Whether executing this action produces a generated artifact.
    pub fn is_asset(&self) -> bool {
        self.action_type().starts_with("asset_")
    }

    /// Identifiers of other actions this action references directly.
    ///
    /// Nested actions carry their own references; use [`Action::visit`] to
    /// collect them recursively.
    pub fn referenced_ids(&self) -> Vec<&str> {
        match self {
            Action::AssetCutscene { shots, .. } => shots
                .iter()
                .flat_map(|shot| [shot.image_id.as_str(), shot.subtitle_id.as_str()])
                .collect(),
            Action::PlayCutscene { cutscene_id, .. } => vec![cutscene_id.as_str()],
            Action::ShowModal {
                image_id,
                subtitle_id,
                ..
            } => image_id
                .as_deref()
                .into_iter()
                .chain(subtitle_id.as_deref())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Visit this action and every action nested inside it, depth first.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Action)) {
        f(self);
        match self {
            Action::WhenThen { then, .. } => then.visit(f),
            Action::AddPlayerChoice { options, .. } => {
                for option in options {
                    for reaction in &option.reactions {
                        reaction.visit(f);
                    }
                }
            }
            _ => {}
        }
    }
}
