//! Core data types for the Giotto asset pipeline.
//!
//! This crate defines the action DSL data model shared by the script
//! compiler and the execution engine:
//!
//! - **Actions**: the tagged, recursive sum type an action script is made of
//! - **Vocabulary**: the string-formed enums actions are written in (image
//!   sizes, generation models, voice parameters, shot animations)
//! - **Asset results**: the record an executed asset action produces
//! - **Cost ledger**: per-type/per-model cost accounting for one batch
//!
//! # Example
//!
//! ```
//! use giotto_core::{Action, ActionDocument};
//!
//! let doc: ActionDocument = serde_json::from_str(
//!     r#"{"actions":[{"type":"reason","text":"setting the scene"}]}"#,
//! ).unwrap();
//! assert_eq!(doc.actions.len(), 1);
//! assert_eq!(doc.actions[0].action_type(), "reason");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod action;
mod asset;
mod cost;
mod document;
mod vocab;

pub use action::{Action, ChoiceOption, Shot};
pub use asset::{AssetKind, AssetResult, CostEstimate};
pub use cost::{CostRecord, CostTracker};
pub use document::ActionDocument;
pub use vocab::{
    ImageModel, ImageSize, ShotAnimation, SpeechModel, VoiceGender, VoicePace, VoiceTone,
};
