//! Dependency resolution: reference edges, cycle detection, topological
//! ordering.
//!
//! Runs only after semantic validation is clean, so every reference is
//! known to resolve. Both the cycle scan and the sort cover the full node
//! set.

use crate::ValidationError;
use giotto_core::Action;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Build the dependency map: node ID -> set of node IDs it references.
///
/// References made anywhere inside a node's action (including nested
/// `when_then` and choice reactions) become edges of that node. Only
/// references to other *nodes* create edges; references to identifiers
/// declared solely inside nested actions are resolvable but carry no
/// scheduling constraint.
pub fn dependency_map(entries: &[(String, Action)]) -> HashMap<String, BTreeSet<String>> {
    let node_ids: HashSet<&str> = entries.iter().map(|(id, _)| id.as_str()).collect();

    entries
        .iter()
        .map(|(id, action)| {
            let mut deps = BTreeSet::new();
            action.visit(&mut |nested| {
                for referent in nested.referenced_ids() {
                    if node_ids.contains(referent) {
                        deps.insert(referent.to_string());
                    }
                }
            });
            (id.clone(), deps)
        })
        .collect()
}

/// Detect reference cycles with a depth-first scan.
///
/// Each cycle is reported once, carrying the full cycle path in traversal
/// order rather than just the revisited node.
#[tracing::instrument(skip(order, deps), fields(nodes = order.len()))]
pub fn detect_cycles(
    order: &[String],
    deps: &HashMap<String, BTreeSet<String>>,
) -> Vec<ValidationError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Visiting,
        Done,
    }

    let mut errors = Vec::new();
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut path: Vec<String> = Vec::new();

    fn visit<'a>(
        node: &'a str,
        deps: &'a HashMap<String, BTreeSet<String>>,
        marks: &mut HashMap<&'a str, Mark>,
        path: &mut Vec<String>,
        errors: &mut Vec<ValidationError>,
    ) {
        marks.insert(node, Mark::Visiting);
        path.push(node.to_string());

        if let Some(targets) = deps.get(node) {
            for target in targets {
                match marks.get(target.as_str()) {
                    Some(Mark::Visiting) => {
                        // Back edge: the cycle is the active path from the
                        // revisited node onward.
                        if let Some(pos) = path.iter().position(|p| p == target) {
                            errors.push(ValidationError::circular_dependency(&path[pos..]));
                        }
                    }
                    Some(Mark::Done) => {}
                    None => visit(target, deps, marks, path, errors),
                }
            }
        }

        path.pop();
        marks.insert(node, Mark::Done);
    }

    for node in order {
        if !marks.contains_key(node.as_str()) {
            visit(node, deps, &mut marks, &mut path, &mut errors);
        }
    }

    if !errors.is_empty() {
        tracing::warn!(cycles = errors.len(), "Reference cycles detected");
    }
    errors
}

/// Compute a topological order with Kahn's algorithm.
///
/// The queue is seeded in declaration order, so mutually-independent nodes
/// come out in a stable, declaration-like order; the relative order between
/// a dependency and its dependents is always respected.
///
/// Assumes `deps` is acyclic (checked by [`detect_cycles`] beforehand).
#[tracing::instrument(skip(order, deps), fields(nodes = order.len()))]
pub fn topological_order(
    order: &[String],
    deps: &HashMap<String, BTreeSet<String>>,
) -> Vec<String> {
    let mut in_degree: HashMap<&str, usize> = order
        .iter()
        .map(|id| (id.as_str(), deps.get(id).map_or(0, BTreeSet::len)))
        .collect();

    // Inverse adjacency: dependency -> nodes waiting on it
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
    for id in order {
        if let Some(targets) = deps.get(id) {
            for target in targets {
                dependents.entry(target.as_str()).or_default().push(id);
            }
        }
    }

    let mut queue: VecDeque<&str> = order
        .iter()
        .filter(|id| in_degree.get(id.as_str()) == Some(&0))
        .map(String::as_str)
        .collect();

    let mut sorted = Vec::with_capacity(order.len());
    while let Some(node) = queue.pop_front() {
        sorted.push(node.to_string());
        if let Some(waiting) = dependents.get(node) {
            for dependent in waiting {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(dependent);
                    }
                }
            }
        }
    }

    tracing::debug!(sorted = sorted.len(), "Computed execution order");
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps_of(pairs: &[(&str, &[&str])]) -> (Vec<String>, HashMap<String, BTreeSet<String>>) {
        let order: Vec<String> = pairs.iter().map(|(id, _)| id.to_string()).collect();
        let deps = pairs
            .iter()
            .map(|(id, targets)| {
                (
                    id.to_string(),
                    targets.iter().map(|t| t.to_string()).collect(),
                )
            })
            .collect();
        (order, deps)
    }

    #[test]
    fn cycle_reports_full_path_in_traversal_order() {
        let (order, deps) = deps_of(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]);
        let errors = detect_cycles(&order, &deps);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("a -> b -> c -> a"));
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let (order, deps) = deps_of(&[("a", &["a"])]);
        let errors = detect_cycles(&order, &deps);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("a -> a"));
    }

    #[test]
    fn acyclic_graph_reports_nothing() {
        let (order, deps) = deps_of(&[("a", &[]), ("b", &["a"]), ("c", &["a", "b"])]);
        assert!(detect_cycles(&order, &deps).is_empty());
    }

    #[test]
    fn topological_order_respects_dependencies() {
        let (order, deps) = deps_of(&[("c", &["a", "b"]), ("b", &["a"]), ("a", &[])]);
        let sorted = topological_order(&order, &deps);
        assert_eq!(sorted, vec!["a", "b", "c"]);
    }

    #[test]
    fn independent_nodes_keep_declaration_order() {
        let (order, deps) = deps_of(&[("x", &[]), ("y", &[]), ("z", &[])]);
        assert_eq!(topological_order(&order, &deps), vec!["x", "y", "z"]);
    }
}
