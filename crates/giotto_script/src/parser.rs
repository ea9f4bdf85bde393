//! The script parser: schema check, semantic check, dependency resolution,
//! graph construction.

use crate::{ActionGraph, ValidationError, resolve, schema, semantic};
use giotto_core::ActionDocument;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;

/// Dot-separated identifier path: no leading, trailing, or double dots.
const IDENTIFIER_PATH: &str = r"^[a-zA-Z_][a-zA-Z0-9_]*(\.[a-zA-Z_][a-zA-Z0-9_]*)*$";

/// Compile the identifier path pattern.
pub(crate) fn identifier_path_pattern() -> Regex {
    // The pattern is a compile-time constant; failure would be a defect in
    // this crate, not in caller input.
    Regex::new(IDENTIFIER_PATH).expect("identifier path pattern compiles")
}

/// Compiles action scripts into executable graphs.
///
/// Parsers are plain values constructed where they are used; hold one and
/// reuse it to amortize the path-pattern compilation.
///
/// # Example
///
/// ```
/// use giotto_script::{ScriptParser, ValidationErrorKind};
///
/// let parser = ScriptParser::new();
///
/// let errors = parser
///     .parse(r#"{"actions":[{"type":"play_cutscene","cutscene_id":"missing"}]}"#)
///     .unwrap_err();
/// assert_eq!(errors[0].kind, ValidationErrorKind::UnknownReference);
/// ```
#[derive(Debug, Clone)]
pub struct ScriptParser {
    path_pattern: Regex,
}

impl ScriptParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self {
            path_pattern: identifier_path_pattern(),
        }
    }

    /// Parse an action script from JSON source.
    ///
    /// # Errors
    ///
    /// Returns the full diagnostic list on failure. A syntactically invalid
    /// document yields a single schema error; schema errors are reported
    /// before semantic checks run; semantic errors are collected across all
    /// passes; cycles are reported with their full path.
    #[tracing::instrument(skip(self, source), fields(bytes = source.len()))]
    pub fn parse(&self, source: &str) -> Result<ActionGraph, Vec<ValidationError>> {
        let value: Value = match serde_json::from_str(source) {
            Ok(value) => value,
            Err(e) => {
                return Err(vec![ValidationError::schema("$", format!("invalid JSON: {}", e))]);
            }
        };
        self.parse_value(&value)
    }

    /// Parse an action script from an already-decoded JSON value.
    #[tracing::instrument(skip(self, value))]
    pub fn parse_value(&self, value: &Value) -> Result<ActionGraph, Vec<ValidationError>> {
        // Phase 1: structural check. Fatal; reported before any semantic pass.
        let schema_errors = schema::validate_document(value);
        if !schema_errors.is_empty() {
            tracing::debug!(errors = schema_errors.len(), "Schema validation failed");
            return Err(schema_errors);
        }

        let doc: ActionDocument = match serde_json::from_value(value.clone()) {
            Ok(doc) => doc,
            Err(e) => {
                // The schema walker accepts exactly what serde accepts; a
                // divergence here is a bug in this crate.
                return Err(vec![ValidationError::schema(
                    "$",
                    format!("document failed to deserialize: {}", e),
                )]);
            }
        };

        self.parse_document(doc)
    }

    /// Compile a typed document into an executable graph.
    ///
    /// Runs semantic validation and dependency analysis; schema validation
    /// is unnecessary for documents that already carry types.
    #[tracing::instrument(skip(self, doc), fields(actions = doc.actions.len()))]
    pub fn parse_document(&self, doc: ActionDocument) -> Result<ActionGraph, Vec<ValidationError>> {
        // Phase 2: semantic passes, all of which run even if earlier ones
        // failed.
        let semantic_errors = semantic::validate(&doc, &self.path_pattern);
        if !semantic_errors.is_empty() {
            tracing::debug!(errors = semantic_errors.len(), "Semantic validation failed");
            return Err(semantic_errors);
        }

        // Phase 3: identify nodes, resolve dependencies, reject cycles.
        let entries = assign_node_ids(&doc);
        let deps = resolve::dependency_map(&entries);
        let declaration_order: Vec<String> = entries.iter().map(|(id, _)| id.clone()).collect();

        let cycle_errors = resolve::detect_cycles(&declaration_order, &deps);
        if !cycle_errors.is_empty() {
            return Err(cycle_errors);
        }

        // Phase 4: order and materialize.
        let execution_order = resolve::topological_order(&declaration_order, &deps);
        let graph = ActionGraph::build(entries, deps, execution_order);

        tracing::info!(
            nodes = graph.len(),
            assets = graph.asset_actions().len(),
            game = graph.game_actions().len(),
            "Compiled action graph"
        );
        Ok(graph)
    }
}

impl Default for ScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Pair every top-level action with a node identifier.
///
/// Declared identifiers are used as-is; anonymous actions get
/// `<type>_<index>`, suffixed with underscores in the unlikely event a
/// declared identifier already uses that name.
fn assign_node_ids(doc: &ActionDocument) -> Vec<(String, giotto_core::Action)> {
    let mut used: HashSet<String> = doc
        .declared_ids()
        .into_iter()
        .map(str::to_string)
        .collect();

    doc.actions
        .iter()
        .enumerate()
        .map(|(index, action)| {
            let id = match action.id() {
                Some(id) => id.to_string(),
                None => {
                    let mut candidate = format!("{}_{}", action.action_type(), index);
                    while !used.insert(candidate.clone()) {
                        candidate.push('_');
                    }
                    candidate
                }
            };
            (id, action.clone())
        })
        .collect()
}
