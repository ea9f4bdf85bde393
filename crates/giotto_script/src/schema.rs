//! Structural validation of raw action documents.
//!
//! The document is checked against the recursive action grammar before any
//! typed deserialization, so every malformed field is reported with a
//! dotted path in one pass. Serde would stop at the first mismatch; this
//! walker keeps going.

use crate::ValidationError;
use giotto_core::{
    ImageModel, ImageSize, ShotAnimation, SpeechModel, VoiceGender, VoicePace, VoiceTone,
};
use serde_json::{Map, Value};
use std::str::FromStr;
use strum::IntoEnumIterator;

/// All recognized action tags.
const ACTION_TYPES: &[&str] = &[
    "reason",
    "asset_image",
    "asset_subtitle",
    "asset_cutscene",
    "play_cutscene",
    "show_modal",
    "add_feature",
    "remove_feature",
    "when_then",
    "add_player_choice",
];

/// Validate a raw document against the action grammar.
///
/// Returns one error per violated field. An empty result means the document
/// deserializes cleanly into [`giotto_core::ActionDocument`].
#[tracing::instrument(skip(value))]
pub fn validate_document(value: &Value) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let Some(root) = value.as_object() else {
        errors.push(ValidationError::schema("$", "expected an object"));
        return errors;
    };

    check_unknown_keys(root, &["actions"], "$", &mut errors);

    let Some(actions) = root.get("actions") else {
        errors.push(ValidationError::schema("actions", "missing required field"));
        return errors;
    };

    let Some(actions) = actions.as_array() else {
        errors.push(ValidationError::schema("actions", "expected an array"));
        return errors;
    };

    for (index, action) in actions.iter().enumerate() {
        validate_action(action, &format!("actions[{}]", index), &mut errors);
    }

    tracing::debug!(errors = errors.len(), "Schema validation finished");
    errors
}

/// Validate one action value, recursing into nested actions.
fn validate_action(value: &Value, path: &str, errors: &mut Vec<ValidationError>) {
    let Some(obj) = value.as_object() else {
        errors.push(ValidationError::schema(path, "expected an object"));
        return;
    };

    let Some(tag) = obj.get("type") else {
        errors.push(ValidationError::schema(
            format!("{}.type", path),
            "missing required field",
        ));
        return;
    };

    let Some(tag) = tag.as_str() else {
        errors.push(ValidationError::schema(
            format!("{}.type", path),
            "expected a string",
        ));
        return;
    };

    match tag {
        "reason" => {
            check_unknown_keys(obj, &["type", "id", "text"], path, errors);
            optional_string(obj, "id", path, errors);
            required_string(obj, "text", path, errors);
        }
        "asset_image" => {
            check_unknown_keys(obj, &["type", "id", "prompt", "size", "model"], path, errors);
            optional_string(obj, "id", path, errors);
            required_string(obj, "prompt", path, errors);
            required_enum::<ImageSize>(obj, "size", path, errors);
            required_enum::<ImageModel>(obj, "model", path, errors);
        }
        "asset_subtitle" => {
            check_unknown_keys(
                obj,
                &[
                    "type",
                    "id",
                    "text",
                    "voice_gender",
                    "voice_tone",
                    "voice_pace",
                    "model",
                ],
                path,
                errors,
            );
            optional_string(obj, "id", path, errors);
            required_string(obj, "text", path, errors);
            required_enum::<VoiceGender>(obj, "voice_gender", path, errors);
            required_enum::<VoiceTone>(obj, "voice_tone", path, errors);
            required_enum::<VoicePace>(obj, "voice_pace", path, errors);
            required_enum::<SpeechModel>(obj, "model", path, errors);
        }
        "asset_cutscene" => {
            check_unknown_keys(obj, &["type", "id", "shots"], path, errors);
            optional_string(obj, "id", path, errors);
            match obj.get("shots") {
                None => errors.push(ValidationError::schema(
                    format!("{}.shots", path),
                    "missing required field",
                )),
                Some(Value::Array(shots)) => {
                    for (index, shot) in shots.iter().enumerate() {
                        validate_shot(shot, &format!("{}.shots[{}]", path, index), errors);
                    }
                }
                Some(_) => errors.push(ValidationError::schema(
                    format!("{}.shots", path),
                    "expected an array",
                )),
            }
        }
        "play_cutscene" => {
            check_unknown_keys(obj, &["type", "id", "cutscene_id"], path, errors);
            optional_string(obj, "id", path, errors);
            required_string(obj, "cutscene_id", path, errors);
        }
        "show_modal" => {
            check_unknown_keys(
                obj,
                &["type", "id", "title", "text", "image_id", "subtitle_id"],
                path,
                errors,
            );
            optional_string(obj, "id", path, errors);
            optional_string(obj, "title", path, errors);
            required_string(obj, "text", path, errors);
            optional_string(obj, "image_id", path, errors);
            optional_string(obj, "subtitle_id", path, errors);
        }
        "add_feature" => {
            check_unknown_keys(obj, &["type", "id", "target", "value"], path, errors);
            optional_string(obj, "id", path, errors);
            required_string(obj, "target", path, errors);
            // `value` may be any JSON value
        }
        "remove_feature" => {
            check_unknown_keys(obj, &["type", "id", "target"], path, errors);
            optional_string(obj, "id", path, errors);
            required_string(obj, "target", path, errors);
        }
        "when_then" => {
            check_unknown_keys(obj, &["type", "id", "condition", "then"], path, errors);
            optional_string(obj, "id", path, errors);
            required_string(obj, "condition", path, errors);
            match obj.get("then") {
                None => errors.push(ValidationError::schema(
                    format!("{}.then", path),
                    "missing required field",
                )),
                Some(nested) => validate_action(nested, &format!("{}.then", path), errors),
            }
        }
        "add_player_choice" => {
            check_unknown_keys(obj, &["type", "id", "prompt", "options"], path, errors);
            optional_string(obj, "id", path, errors);
            required_string(obj, "prompt", path, errors);
            match obj.get("options") {
                None => errors.push(ValidationError::schema(
                    format!("{}.options", path),
                    "missing required field",
                )),
                Some(Value::Array(options)) => {
                    for (index, option) in options.iter().enumerate() {
                        validate_option(option, &format!("{}.options[{}]", path, index), errors);
                    }
                }
                Some(_) => errors.push(ValidationError::schema(
                    format!("{}.options", path),
                    "expected an array",
                )),
            }
        }
        unknown => {
            errors.push(ValidationError::schema(
                format!("{}.type", path),
                format!(
                    "unknown action type '{}', expected one of: {}",
                    unknown,
                    ACTION_TYPES.join(", ")
                ),
            ));
        }
    }
}

/// Validate one cutscene shot.
fn validate_shot(value: &Value, path: &str, errors: &mut Vec<ValidationError>) {
    let Some(obj) = value.as_object() else {
        errors.push(ValidationError::schema(path, "expected an object"));
        return;
    };

    check_unknown_keys(
        obj,
        &["image_id", "subtitle_id", "duration", "animation"],
        path,
        errors,
    );
    required_string(obj, "image_id", path, errors);
    required_string(obj, "subtitle_id", path, errors);
    required_number(obj, "duration", path, errors);
    required_enum::<ShotAnimation>(obj, "animation", path, errors);
}

/// Validate one player-choice option, recursing into its reactions.
fn validate_option(value: &Value, path: &str, errors: &mut Vec<ValidationError>) {
    let Some(obj) = value.as_object() else {
        errors.push(ValidationError::schema(path, "expected an object"));
        return;
    };

    check_unknown_keys(obj, &["text", "reactions"], path, errors);
    required_string(obj, "text", path, errors);
    match obj.get("reactions") {
        None => {}
        Some(Value::Array(reactions)) => {
            for (index, reaction) in reactions.iter().enumerate() {
                validate_action(reaction, &format!("{}.reactions[{}]", path, index), errors);
            }
        }
        Some(_) => errors.push(ValidationError::schema(
            format!("{}.reactions", path),
            "expected an array",
        )),
    }
}

fn check_unknown_keys(
    obj: &Map<String, Value>,
    allowed: &[&str],
    path: &str,
    errors: &mut Vec<ValidationError>,
) {
    for key in obj.keys() {
        if !allowed.contains(&key.as_str()) {
            errors.push(ValidationError::schema(
                format!("{}.{}", path, key),
                "unknown field",
            ));
        }
    }
}

fn required_string(
    obj: &Map<String, Value>,
    key: &str,
    path: &str,
    errors: &mut Vec<ValidationError>,
) {
    match obj.get(key) {
        None => errors.push(ValidationError::schema(
            format!("{}.{}", path, key),
            "missing required field",
        )),
        Some(Value::String(_)) => {}
        Some(_) => errors.push(ValidationError::schema(
            format!("{}.{}", path, key),
            "expected a string",
        )),
    }
}

fn optional_string(
    obj: &Map<String, Value>,
    key: &str,
    path: &str,
    errors: &mut Vec<ValidationError>,
) {
    if let Some(value) = obj.get(key)
        && !value.is_string()
    {
        errors.push(ValidationError::schema(
            format!("{}.{}", path, key),
            "expected a string",
        ));
    }
}

fn required_number(
    obj: &Map<String, Value>,
    key: &str,
    path: &str,
    errors: &mut Vec<ValidationError>,
) {
    match obj.get(key) {
        None => errors.push(ValidationError::schema(
            format!("{}.{}", path, key),
            "missing required field",
        )),
        Some(Value::Number(_)) => {}
        Some(_) => errors.push(ValidationError::schema(
            format!("{}.{}", path, key),
            "expected a number",
        )),
    }
}

fn required_enum<T>(
    obj: &Map<String, Value>,
    key: &str,
    path: &str,
    errors: &mut Vec<ValidationError>,
) where
    T: FromStr + IntoEnumIterator + std::fmt::Display,
{
    let field_path = format!("{}.{}", path, key);
    match obj.get(key) {
        None => errors.push(ValidationError::schema(field_path, "missing required field")),
        Some(Value::String(s)) => {
            if T::from_str(s).is_err() {
                let allowed: Vec<String> = T::iter().map(|v| v.to_string()).collect();
                errors.push(ValidationError::schema(
                    field_path,
                    format!("invalid value '{}', expected one of: {}", s, allowed.join(", ")),
                ));
            }
        }
        Some(_) => errors.push(ValidationError::schema(field_path, "expected a string")),
    }
}
