//! Semantic validation passes.
//!
//! Four independent passes over the typed document. All four run even when
//! an earlier pass already failed, so one parse surfaces every problem at
//! once. Dependency analysis assumes well-formed references and only runs
//! when all passes are clean.

use crate::{ValidationError, suggest};
use giotto_core::{Action, ActionDocument};
use regex::Regex;
use std::collections::HashSet;

/// Run all semantic passes and concatenate their findings.
#[tracing::instrument(skip(doc, path_pattern), fields(actions = doc.actions.len()))]
pub fn validate(doc: &ActionDocument, path_pattern: &Regex) -> Vec<ValidationError> {
    let mut errors = check_unique_ids(doc);
    errors.extend(check_references(doc));
    errors.extend(check_condition_paths(doc, path_pattern));
    errors.extend(check_target_paths(doc, path_pattern));
    tracing::debug!(errors = errors.len(), "Semantic validation finished");
    errors
}

/// Flag every identifier declared more than once, including identifiers
/// nested inside `when_then` and player-choice reactions.
///
/// N occurrences of one identifier yield N-1 errors.
fn check_unique_ids(doc: &ActionDocument) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for (index, action) in doc.actions.iter().enumerate() {
        action.visit(&mut |nested| {
            if let Some(id) = nested.id()
                && !seen.insert(id)
            {
                errors.push(ValidationError::duplicate_id(id, index));
            }
        });
    }

    errors
}

/// Verify every reference resolves to a declared identifier, offering typo
/// suggestions on a miss.
fn check_references(doc: &ActionDocument) -> Vec<ValidationError> {
    let mut declared: HashSet<&str> = HashSet::new();
    doc.visit(&mut |action| {
        if let Some(id) = action.id() {
            declared.insert(id);
        }
    });

    let mut errors = Vec::new();
    for (index, action) in doc.actions.iter().enumerate() {
        action.visit(&mut |nested| {
            for referent in nested.referenced_ids() {
                if !declared.contains(referent) {
                    let suggestions = suggest(referent, declared.iter().copied());
                    errors.push(ValidationError::unknown_reference(
                        referent,
                        index,
                        nested.id(),
                        suggestions,
                    ));
                }
            }
        });
    }

    errors
}

/// Verify `when_then` conditions are dot-separated identifier paths.
fn check_condition_paths(doc: &ActionDocument, pattern: &Regex) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (index, action) in doc.actions.iter().enumerate() {
        action.visit(&mut |nested| {
            if let Action::WhenThen { id, condition, .. } = nested
                && !pattern.is_match(condition)
            {
                errors.push(ValidationError::invalid_condition(
                    condition,
                    index,
                    id.as_deref(),
                ));
            }
        });
    }
    errors
}

/// Verify feature targets are dot-separated identifier paths.
fn check_target_paths(doc: &ActionDocument, pattern: &Regex) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (index, action) in doc.actions.iter().enumerate() {
        action.visit(&mut |nested| {
            let (id, target) = match nested {
                Action::AddFeature { id, target, .. } => (id, target),
                Action::RemoveFeature { id, target } => (id, target),
                _ => return,
            };
            if !pattern.is_match(target) {
                errors.push(ValidationError::invalid_target(
                    target,
                    index,
                    id.as_deref(),
                ));
            }
        });
    }
    errors
}
