//! The immutable action graph.
//!
//! Built once by a pure constructor after validation and dependency
//! resolution succeed. There is no mutation API: per-run execution status
//! is owned by the execution engine, so a built graph can be shared and
//! read concurrently without synchronization.

use giotto_core::Action;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Build-time scheduling status of a node.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeStatus {
    /// Waiting on dependencies
    Pending,
    /// All dependencies satisfied
    Ready,
    /// Currently executing
    Executing,
    /// Finished successfully
    Completed,
    /// Finished with an error
    Failed,
}

/// One node of the action graph: an action plus its edges.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionNode {
    action: Action,
    dependencies: BTreeSet<String>,
    dependents: BTreeSet<String>,
    status: NodeStatus,
}

impl ActionNode {
    /// The wrapped action.
    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Identifiers this node needs before it can execute.
    pub fn dependencies(&self) -> &BTreeSet<String> {
        &self.dependencies
    }

    /// Identifiers that need this node.
    pub fn dependents(&self) -> &BTreeSet<String> {
        &self.dependents
    }

    /// Build-time status: `Ready` iff `dependencies` is empty.
    pub fn status(&self) -> NodeStatus {
        self.status
    }
}

/// The validated, immutable dependency graph of one action script.
///
/// Nodes are keyed by identifier; anonymous actions get synthetic
/// `<type>_<index>` identifiers so every action stays individually
/// trackable in results. `execution_order` is a topological ordering
/// covering every node exactly once: every asset-action ID precedes every
/// node that references it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionGraph {
    nodes: HashMap<String, ActionNode>,
    execution_order: Vec<String>,
    asset_actions: Vec<String>,
    game_actions: Vec<String>,
}

impl ActionGraph {
    /// Pure constructor. `entries` are `(id, action)` pairs in declaration
    /// order; `deps` maps each id to the ids it references.
    pub(crate) fn build(
        entries: Vec<(String, Action)>,
        deps: HashMap<String, BTreeSet<String>>,
        execution_order: Vec<String>,
    ) -> Self {
        // Dependents are the inverse of the dependency map.
        let mut dependents: HashMap<String, BTreeSet<String>> = HashMap::new();
        for (id, targets) in &deps {
            for target in targets {
                dependents
                    .entry(target.clone())
                    .or_default()
                    .insert(id.clone());
            }
        }

        let mut asset_actions = Vec::new();
        let mut game_actions = Vec::new();
        let mut nodes = HashMap::with_capacity(entries.len());

        for (id, action) in entries {
            if action.is_asset() {
                asset_actions.push(id.clone());
            } else if !matches!(action, Action::Reason { .. }) {
                game_actions.push(id.clone());
            }

            let dependencies = deps.get(&id).cloned().unwrap_or_default();
            let status = if dependencies.is_empty() {
                NodeStatus::Ready
            } else {
                NodeStatus::Pending
            };

            nodes.insert(
                id.clone(),
                ActionNode {
                    action,
                    dependencies,
                    dependents: dependents.remove(&id).unwrap_or_default(),
                    status,
                },
            );
        }

        Self {
            nodes,
            execution_order,
            asset_actions,
            game_actions,
        }
    }

    /// Look up a node by identifier.
    pub fn node(&self, id: &str) -> Option<&ActionNode> {
        self.nodes.get(id)
    }

    /// Whether a node exists under the identifier.
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Iterate over all nodes in unspecified order.
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &ActionNode)> {
        self.nodes.iter().map(|(id, node)| (id.as_str(), node))
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Topological execution order covering every node exactly once.
    pub fn execution_order(&self) -> &[String] {
        &self.execution_order
    }

    /// Identifiers of asset actions, in declaration order.
    pub fn asset_actions(&self) -> &[String] {
        &self.asset_actions
    }

    /// Identifiers of game actions, in declaration order. `reason`
    /// annotations belong to neither partition.
    pub fn game_actions(&self) -> &[String] {
        &self.game_actions
    }
}
