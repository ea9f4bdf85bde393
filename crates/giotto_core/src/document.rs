//! The external input document.

use crate::Action;
use serde::{Deserialize, Serialize};

/// A complete action script: `{ "actions": [...] }`.
///
/// # Examples
///
/// ```
/// use giotto_core::ActionDocument;
///
/// let doc: ActionDocument = serde_json::from_str(
///     r#"{"actions":[{"type":"add_feature","target":"world.map"}]}"#,
/// ).unwrap();
/// assert_eq!(doc.actions.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDocument {
    /// Script steps in declaration order
    pub actions: Vec<Action>,
}

impl ActionDocument {
    /// Visit every action in the document, including nested ones, depth first.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Action)) {
        for action in &self.actions {
            action.visit(f);
        }
    }

    /// Every declared identifier in the document, in traversal order.
    ///
    /// Duplicates are preserved so callers can diagnose them.
    pub fn declared_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.visit(&mut |action| {
            if let Some(id) = action.id() {
                ids.push(id);
            }
        });
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_ids_include_nested_and_preserve_duplicates() {
        let doc: ActionDocument = serde_json::from_str(
            r#"{"actions":[
                {"type":"asset_image","id":"x","prompt":"p","size":"1024x1024","model":"flux-schnell"},
                {"type":"when_then","condition":"a.b","then":
                    {"type":"show_modal","id":"x","text":"t"}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(doc.declared_ids(), vec!["x", "x"]);
    }
}
